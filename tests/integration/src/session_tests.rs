//! Editor-session scenarios
//!
//! Each test drives one store through a sequence of host events the way an
//! editor would: user setup at startup, filetype and buffer autocommands,
//! command-line entry, and one-off completion requests.

use cmp_config::{
    BufferedSink, ConfigSchema, ConfigStore, ConfigValue, LayerKey, Notice, NoticeSink,
    ResolveMode,
};
use cmp_test_utils::{FakeHost, fragment, legacy_fragment};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

// =============================================================================
// Test Infrastructure
// =============================================================================

/// Built-in defaults every session starts from
fn defaults() -> ConfigSchema {
    fragment(json!({
        "enabled": true,
        "preselect": "item",
        "completion": {"autocomplete": ["TextChanged"], "keyword_length": 1},
        "view": {"entries": "custom"},
        "sources": []
    }))
}

fn session(host: &Rc<FakeHost>) -> (ConfigStore, Rc<BufferedSink>) {
    let sink = Rc::new(BufferedSink::new());
    let store = ConfigStore::builder(Rc::clone(host))
        .notice_sink(Rc::clone(&sink))
        .defaults(defaults())
        .build();
    (store, sink)
}

fn source_names(store: &ConfigStore) -> Vec<String> {
    store
        .get()
        .sources()
        .into_iter()
        .flatten()
        .filter_map(|s| s.get("name").and_then(ConfigValue::as_str))
        .map(str::to_string)
        .collect()
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn typical_session() {
    let host = FakeHost::in_buffer(1, "text").shared();
    let (mut store, sink) = session(&host);

    // User setup
    store.set_global(fragment(json!({
        "sources": [{"name": "buffer"}, {"name": "path"}],
        "mapping": {"<c-space>": "complete"}
    })));
    store.set_filetype(fragment(json!({"sources": [{"name": "nvim_lua"}]})), "lua");
    store.set_cmdline(fragment(json!({"sources": [{"name": "buffer"}]})), ["/", "?"]);
    store.set_cmdline(fragment(json!({"sources": [{"name": "cmdline"}]})), ":");
    assert!(sink.is_empty());

    assert_eq!(source_names(&store), vec!["buffer", "path"]);
    assert_eq!(
        store.get().get_path("completion.keyword_length"),
        Some(&ConfigValue::Integer(1))
    );
    assert_eq!(
        store.get().get("mapping").and_then(|m| m.get("<C-Space>")),
        Some(&ConfigValue::from(json!({"i": "complete"})))
    );

    // Open a Lua file
    host.switch_buffer(2, "lua");
    assert_eq!(source_names(&store), vec!["nvim_lua"]);

    // Search forward, then run an ex command
    host.enter_cmdline("/");
    assert_eq!(source_names(&store), vec!["buffer"]);
    host.enter_cmdline(":");
    assert_eq!(source_names(&store), vec!["cmdline"]);
    host.enter_cmdline("@");
    assert!(source_names(&store).is_empty());
    host.leave_cmdline();

    // One manual completion with different sources
    store.set_onetime(fragment(json!({"sources": [{"name": "luasnip"}]})));
    assert_eq!(source_names(&store), vec!["luasnip"]);
    store.reset_onetime();
    assert_eq!(source_names(&store), vec!["nvim_lua"]);

    assert!(sink.is_empty());
}

#[test]
fn builder_defaults_are_the_initial_global_layer() {
    let host = FakeHost::new().shared();
    let (store, _sink) = session(&host);

    assert_eq!(store.revision(&LayerKey::Global), 1);
    assert!(store.is_enabled());
    assert!(!store.is_native_menu());
    assert_eq!(store.get().to_json(), defaults().to_json());
}

#[test]
fn buffer_local_disable() {
    let host = FakeHost::in_buffer(1, "markdown").shared();
    let (mut store, _sink) = session(&host);

    store.set_buffer(fragment(json!({"enabled": false})), 5);
    assert!(store.is_enabled());

    host.switch_buffer(5, "markdown");
    assert!(!store.is_enabled());

    store.set_buffer(None, 5);
    assert!(store.is_enabled());
}

#[test]
fn dynamic_enabled_predicate_is_evaluated_per_query() {
    let host = FakeHost::new().shared();
    let (mut store, _sink) = session(&host);

    let in_comment = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&in_comment);
    let mut layer = ConfigSchema::new();
    layer.insert(
        "enabled",
        ConfigValue::function(move || ConfigValue::Bool(!flag.load(Ordering::SeqCst))),
    );
    store.set_global(layer);

    let resolved = store.get();
    assert!(store.is_enabled());
    in_comment.store(true, Ordering::SeqCst);
    assert!(!store.is_enabled());
    // The resolved configuration itself was not recomputed
    assert!(Arc::ptr_eq(&resolved, &store.get()));
}

#[test]
fn legacy_user_config_is_migrated_and_reported_once() {
    let host = FakeHost::new().shared();
    let (mut store, sink) = session(&host);

    store.set_buffer(legacy_fragment(), 1);
    for _ in 0..3 {
        store.get();
    }

    let notices: Vec<String> = sink.drain().iter().map(Notice::plain).collect();
    assert_eq!(
        notices,
        vec![
            "[cmp] experimental.native_menu is deprecated.\nUse view.entries instead.",
            "[cmp] documentation is deprecated.\nUse window.documentation instead.",
            "[cmp] sources[legacy].opts is deprecated.\nUse sources[legacy].option instead.",
            "[cmp] sources[legacy].trigger_characters is deprecated.\nUse sources[legacy].override.get_trigger_characters instead.",
            "[cmp] sources[legacy].keyword_pattern is deprecated.\nUse sources[legacy].override.get_keyword_pattern instead.",
        ]
    );

    // The buffer layer's own view.entries wins over the global default
    assert!(store.is_native_menu());
    let source = store.source_config("legacy").unwrap();
    assert_eq!(source.option.to_json(), json!({"max_items": 5}));

    // Revisiting the same context does not re-report
    host.switch_buffer(2, "");
    host.switch_buffer(1, "");
    store.get();
    assert!(sink.is_empty());

    // A new revision of the layer is normalized (and reported) again
    store.set_buffer(legacy_fragment(), 1);
    store.get();
    assert_eq!(sink.drain().len(), 5);
}

#[test]
fn layers_resolved_in_one_context_do_not_leak_into_another() {
    let host = FakeHost::in_buffer(1, "lua").shared();
    let (mut store, _sink) = session(&host);

    store.set_buffer(fragment(json!({"preselect": "none"})), 1);
    store.set_filetype(fragment(json!({"view": {"entries": "native"}})), "lua");

    assert!(store.is_native_menu());
    assert_eq!(store.get().get("preselect"), Some(&ConfigValue::from("none")));

    host.switch_buffer(2, "rust");
    assert!(!store.is_native_menu());
    assert_eq!(store.get().get("preselect"), Some(&ConfigValue::from("item")));

    match store.plan().mode {
        ResolveMode::Default { buffer, filetype } => {
            assert_eq!(buffer, 2);
            assert_eq!(filetype, "rust");
        }
        other => panic!("expected default mode, got {:?}", other),
    }
}

// =============================================================================
// Reentrancy
// =============================================================================

/// A notice sink that queries the store it is attached to, like a host whose
/// message handler triggers another completion request
#[derive(Default)]
struct ReentrantSink {
    store: RefCell<Weak<ConfigStore>>,
    seen: Cell<usize>,
    resolved: RefCell<Vec<serde_json::Value>>,
}

impl NoticeSink for ReentrantSink {
    fn emit(&self, _notice: &Notice) {
        self.seen.set(self.seen.get() + 1);
        if let Some(store) = self.store.borrow().upgrade() {
            self.resolved.borrow_mut().push(store.get().to_json());
        }
    }
}

#[test]
fn notice_sink_may_query_the_store() {
    let host = FakeHost::new().shared();
    let sink = Rc::new(ReentrantSink::default());
    let mut store = ConfigStore::builder(Rc::clone(&host))
        .notice_sink(Rc::clone(&sink))
        .build();
    store.set_buffer(fragment(json!({"sources": [{"name": "x", "opts": {"y": 1}}]})), 1);

    let store = Rc::new(store);
    *sink.store.borrow_mut() = Rc::downgrade(&store);

    let first = store.get();

    assert_eq!(sink.seen.get(), 1);
    let seen_from_sink = sink.resolved.borrow();
    assert_eq!(seen_from_sink.len(), 1);
    assert_eq!(seen_from_sink[0], first.to_json());
    assert!(Arc::ptr_eq(&first, &store.get()));
}
