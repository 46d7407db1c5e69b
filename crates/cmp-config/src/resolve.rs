//! Context resolution
//!
//! Decides which layers apply to the current host context and in what order.
//! First match wins:
//!
//! 1. **Onetime** - a pending onetime override: `[global, onetime]`
//! 2. **Cmdline** - command-line mode: `[global, cmdline[type]]`; a type with no
//!    layer yet resolves with `sources = []` so command-line completion never
//!    inherits buffer sources
//! 3. **Default** - `[global, filetype, buffer]`, buffer winning over filetype
//!
//! A [`Plan`] also yields the cache key that identifies its result: the mode,
//! the context identity and the revision of every contributing layer.

use crate::cache::CacheKey;
use crate::context::{BufferId, HostContext};
use crate::layer::{INITIAL_REVISION, LayerKey, LayerStore, Revision};
use crate::schema::ConfigSchema;
use crate::value::ConfigValue;
use std::sync::Arc;

/// Which override mode the current context selects
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveMode {
    Onetime,
    Cmdline { kind: String },
    Default { buffer: BufferId, filetype: String },
}

impl ResolveMode {
    pub fn name(&self) -> &'static str {
        match self {
            ResolveMode::Onetime => "onetime",
            ResolveMode::Cmdline { .. } => "cmdline",
            ResolveMode::Default { .. } => "default",
        }
    }
}

/// One layer as it takes part in a resolution
#[derive(Debug, Clone)]
pub struct PlannedLayer {
    pub key: LayerKey,
    pub revision: Revision,
    pub schema: Arc<ConfigSchema>,
}

/// The layers a query merges, lowest precedence first
#[derive(Debug, Clone)]
pub struct Plan {
    pub mode: ResolveMode,
    pub layers: Vec<PlannedLayer>,
}

impl Plan {
    /// Inspect the host and the store and pick the layer set
    pub fn select(store: &LayerStore, host: &dyn HostContext) -> Self {
        let global = planned(store, LayerKey::Global, ConfigSchema::new);

        if store.has_onetime() {
            let onetime = planned(store, LayerKey::Onetime, ConfigSchema::new);
            return Self {
                mode: ResolveMode::Onetime,
                layers: vec![global, onetime],
            };
        }

        if host.is_cmdline_mode() {
            let kind = host.cmdline_type();
            let cmdline = planned(store, LayerKey::Cmdline(kind.clone()), empty_sources);
            return Self {
                mode: ResolveMode::Cmdline { kind },
                layers: vec![global, cmdline],
            };
        }

        let buffer = host.current_buffer();
        let filetype = host.buffer_filetype(buffer);
        Self {
            layers: vec![
                global,
                planned(store, LayerKey::Filetype(filetype.clone()), ConfigSchema::new),
                planned(store, LayerKey::Buffer(buffer), ConfigSchema::new),
            ],
            mode: ResolveMode::Default { buffer, filetype },
        }
    }

    /// Cache key of this plan's result:
    ///
    /// - `("onetime", global_rev, onetime_rev)`
    /// - `("cmdline", global_rev, type, cmdline_rev)`
    /// - `("default", global_rev, filetype, filetype_rev, buffer, buffer_rev)`
    pub fn cache_key(&self) -> CacheKey {
        let mut key = CacheKey::new([self.mode.name()]);
        for layer in &self.layers {
            key = match &layer.key {
                LayerKey::Global | LayerKey::Onetime => key,
                LayerKey::Buffer(id) => key.with(*id),
                LayerKey::Filetype(name) | LayerKey::Cmdline(name) => key.with(name.as_str()),
            };
            key = key.with(layer.revision);
        }
        key
    }
}

fn planned(store: &LayerStore, key: LayerKey, missing: fn() -> ConfigSchema) -> PlannedLayer {
    match store.get(&key) {
        Some(layer) => PlannedLayer {
            revision: layer.revision,
            schema: Arc::clone(&layer.schema),
            key,
        },
        None => PlannedLayer {
            revision: INITIAL_REVISION,
            schema: Arc::new(missing()),
            key,
        },
    }
}

fn empty_sources() -> ConfigSchema {
    let mut schema = ConfigSchema::new();
    schema.insert("sources", ConfigValue::Array(Vec::new()));
    schema
}
