use cmp_config::{
    ConfigSchema, ConfigStore, ConfigValue, LayerKey, Normalizer, StaticContext, Table, merge_schemas,
};
use proptest::prelude::*;

fn leaf() -> impl Strategy<Value = ConfigValue> {
    prop_oneof![
        Just(ConfigValue::Null),
        any::<bool>().prop_map(ConfigValue::Bool),
        any::<i64>().prop_map(ConfigValue::Integer),
        "[a-z]{0,6}".prop_map(ConfigValue::String),
    ]
}

fn value() -> impl Strategy<Value = ConfigValue> {
    leaf().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(ConfigValue::Array),
            prop::collection::btree_map("[a-c]", inner, 0..4).prop_map(ConfigValue::Table),
        ]
    })
}

fn schema() -> impl Strategy<Value = ConfigSchema> {
    prop::collection::btree_map("[a-e]", value(), 0..5).prop_map(ConfigSchema::from)
}

fn legacy_source() -> impl Strategy<Value = ConfigValue> {
    (
        "[a-z]{1,5}",
        prop::option::of(schema()),
        prop::option::of(schema()),
        prop::option::of(prop::collection::vec("[./:]", 0..3)),
        prop::option::of("[a-z]{1,4}"),
    )
        .prop_map(|(name, opts, option, triggers, pattern)| {
            let mut entry = Table::new();
            entry.insert("name".to_string(), name.into());
            if let Some(opts) = opts {
                entry.insert("opts".to_string(), opts.into());
            }
            if let Some(option) = option {
                entry.insert("option".to_string(), option.into());
            }
            if let Some(triggers) = triggers {
                let triggers = triggers.into_iter().map(ConfigValue::from).collect::<Vec<_>>();
                entry.insert("trigger_characters".to_string(), triggers.into());
            }
            if let Some(pattern) = pattern {
                entry.insert("keyword_pattern".to_string(), pattern.into());
            }
            ConfigValue::Table(entry)
        })
}

/// Fragments that mix arbitrary fields with every legacy shape
fn raw_layer() -> impl Strategy<Value = ConfigSchema> {
    (
        schema(),
        prop::option::of(any::<bool>()),
        prop::option::of(value()),
        prop::collection::vec(legacy_source(), 0..3),
        prop::collection::btree_map("<[cCsS]-[a-z]>|<[cC][rR]>|[a-z]", "[a-z]{1,6}", 0..4),
    )
        .prop_map(|(mut schema, native_menu, documentation, sources, mapping)| {
            if let Some(native_menu) = native_menu {
                schema.set_path("experimental.native_menu", native_menu);
            }
            if let Some(documentation) = documentation {
                schema.insert("documentation", documentation);
            }
            if !sources.is_empty() {
                schema.insert("sources", sources);
            }
            if !mapping.is_empty() {
                let mapping: Table = mapping
                    .into_iter()
                    .map(|(k, v)| (k, ConfigValue::from(v)))
                    .collect();
                schema.insert("mapping", mapping);
            }
            schema
        })
}

#[derive(Debug, Clone)]
enum Write {
    Buffer(i64),
    Filetype(String),
    Cmdline(String),
    Onetime,
}

fn write() -> impl Strategy<Value = Write> {
    prop_oneof![
        (1i64..4).prop_map(Write::Buffer),
        "(lua|rust|md)".prop_map(Write::Filetype),
        "[:/?]".prop_map(Write::Cmdline),
        Just(Write::Onetime),
    ]
}

proptest! {
    #[test]
    fn normalization_is_idempotent(raw in raw_layer()) {
        let normalizer = Normalizer::default();
        let once = normalizer.normalize(Some(&raw));
        let twice = normalizer.normalize(Some(&once.schema));

        prop_assert_eq!(&twice.schema, &once.schema);
        // Re-normalizing reports no more than the first pass did
        prop_assert!(twice.notices.len() <= once.notices.len());
    }

    #[test]
    fn normalized_sources_always_carry_option(raw in raw_layer()) {
        let normalized = Normalizer::default().normalize(Some(&raw));

        for source in normalized.schema.sources().into_iter().flatten() {
            if let Some(entry) = source.as_table() {
                prop_assert!(entry.get("option").is_some_and(|o| !o.is_null()));
            }
        }
    }

    #[test]
    fn merge_overlay_wins_on_every_key(base in schema(), overlay in schema()) {
        let merged = merge_schemas(base.clone(), overlay.clone());

        for (key, value) in overlay.iter() {
            match value {
                ConfigValue::Table(_) | ConfigValue::Null => {}
                other => prop_assert_eq!(merged.get(key), Some(other)),
            }
        }
        for (key, value) in base.iter() {
            if !overlay.contains_key(key) {
                prop_assert_eq!(merged.get(key), Some(value));
            }
        }
    }

    #[test]
    fn merge_with_empty_is_identity(base in schema()) {
        prop_assert_eq!(merge_schemas(base.clone(), ConfigSchema::new()), base.clone());
    }

    #[test]
    fn revisions_increase_by_exactly_one(writes in prop::collection::vec(write(), 1..20)) {
        let mut store = ConfigStore::new(StaticContext::default());

        for write in writes {
            let key = match &write {
                Write::Buffer(id) => LayerKey::Buffer(*id),
                Write::Filetype(name) => LayerKey::Filetype(name.clone()),
                Write::Cmdline(kind) => LayerKey::Cmdline(kind.clone()),
                Write::Onetime => LayerKey::Onetime,
            };
            let before = store.revision(&key);
            match write {
                Write::Buffer(id) => store.set_buffer(None, id),
                Write::Filetype(name) => store.set_filetype(None, name),
                Write::Cmdline(kind) => store.set_cmdline(None, kind),
                Write::Onetime => store.set_onetime(None),
            }
            prop_assert_eq!(store.revision(&key), before + 1);
        }
    }
}
