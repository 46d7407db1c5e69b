//! The process-scoped configuration store
//!
//! [`ConfigStore`] owns the layers, the host context, the normalizer and the
//! two revision caches, and exposes the public surface: the `set_*` writers
//! and the `get` family of readers.
//!
//! ```text
//! get() ──> Plan::select (context) ──> cache key ──> resolved cache
//!                                                        │ miss
//!                                                        ▼
//!                                   normalize each layer (layer cache)
//!                                                        │
//!                                                        ▼
//!                                              merge_all ──> Arc<ConfigSchema>
//! ```

use crate::cache::{CacheStats, RevisionCache};
use crate::context::{BufferId, HostContext};
use crate::layer::{LayerKey, LayerStore, Names, Revision};
use crate::merge::{merge_all, merge_schemas};
use crate::normalize::Normalizer;
use crate::notice::{Notice, NoticeSink, TracingSink};
use crate::resolve::{Plan, PlannedLayer};
use crate::schema::ConfigSchema;
use crate::source::SourceConfig;
use crate::value::{ConfigValue, Flag};
use crate::{Error, Result};
use std::fmt;
use std::sync::Arc;

/// Builder for [`ConfigStore`]
pub struct ConfigStoreBuilder {
    host: Box<dyn HostContext>,
    normalizer: Normalizer,
    sink: Box<dyn NoticeSink>,
    defaults: Option<ConfigSchema>,
}

impl ConfigStoreBuilder {
    /// Replace the default normalizer (custom key notation or mapping binder)
    pub fn normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Where deprecation notices go. Defaults to [`TracingSink`].
    pub fn notice_sink(mut self, sink: impl NoticeSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Seed the global layer. It is normalized once, at revision 1.
    pub fn defaults(mut self, defaults: ConfigSchema) -> Self {
        self.defaults = Some(defaults);
        self
    }

    pub fn build(self) -> ConfigStore {
        let store = match self.defaults {
            None => ConfigStore {
                layers: LayerStore::default(),
                host: self.host,
                normalizer: self.normalizer,
                sink: self.sink,
                resolved: RevisionCache::new(),
                normalized: RevisionCache::new(),
            },
            Some(defaults) => {
                let normalized = self.normalizer.normalize(Some(&defaults));
                let store = ConfigStore {
                    layers: LayerStore::new(normalized.schema),
                    host: self.host,
                    normalizer: self.normalizer,
                    sink: self.sink,
                    resolved: RevisionCache::new(),
                    normalized: RevisionCache::new(),
                };
                store.prime_normalized(&LayerKey::Global);
                store.emit(&normalized.notices);
                store
            }
        };
        tracing::debug!("configuration store ready");
        store
    }
}

/// Layered configuration with revision-cached resolution.
///
/// Writers take `&mut self`; readers take `&self`. Deprecation notices raised
/// while resolving are delivered only after the result has been cached, so a
/// notice sink that calls back into the store sees a consistent state.
pub struct ConfigStore {
    layers: LayerStore,
    host: Box<dyn HostContext>,
    normalizer: Normalizer,
    sink: Box<dyn NoticeSink>,
    /// Resolved configurations keyed by mode, context and layer revisions
    resolved: RevisionCache<Arc<ConfigSchema>>,
    /// Normalized layers keyed by layer identity and revision
    normalized: RevisionCache<Arc<ConfigSchema>>,
}

impl fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigStore")
            .field("layers", &self.layers)
            .field("resolved", &self.resolved.len())
            .field("normalized", &self.normalized.len())
            .finish_non_exhaustive()
    }
}

impl ConfigStore {
    /// Create a store with an empty global layer and default collaborators
    pub fn new(host: impl HostContext + 'static) -> Self {
        Self::builder(host).build()
    }

    pub fn builder(host: impl HostContext + 'static) -> ConfigStoreBuilder {
        ConfigStoreBuilder {
            host: Box::new(host),
            normalizer: Normalizer::default(),
            sink: Box::new(TracingSink),
            defaults: None,
        }
    }

    /// Merge `fragment` over the global layer (fragment wins), normalize the
    /// result and store it under a new revision.
    ///
    /// The fragment's mapping keys are canonicalized before the merge so a
    /// new spelling of an existing key replaces it.
    pub fn set_global(&mut self, fragment: impl Into<Option<ConfigSchema>>) {
        let mut fragment: ConfigSchema = fragment.into().unwrap_or_default();
        self.normalizer.normalize_mapping(&mut fragment);
        let base = ConfigSchema::clone(&self.layers.global().schema);
        let merged = merge_schemas(base, fragment);
        let normalized = self.normalizer.normalize(Some(&merged));

        self.layers.replace(&LayerKey::Global, Some(normalized.schema));
        self.prime_normalized(&LayerKey::Global);
        self.emit(&normalized.notices);
    }

    /// Replace the layer of `buffer`
    pub fn set_buffer(&mut self, fragment: impl Into<Option<ConfigSchema>>, buffer: BufferId) {
        self.layers.replace(&LayerKey::Buffer(buffer), fragment.into());
    }

    /// Replace the layer of each named filetype. Each name gets its own copy
    /// and its own revision lineage.
    pub fn set_filetype(
        &mut self,
        fragment: impl Into<Option<ConfigSchema>>,
        filetypes: impl Into<Names>,
    ) {
        let fragment: Option<ConfigSchema> = fragment.into();
        let filetypes: Names = filetypes.into();
        for filetype in filetypes.iter() {
            self.layers
                .replace(&LayerKey::Filetype(filetype.to_string()), fragment.clone());
        }
    }

    /// Replace the layer of each named command-line type (`:`, `/`, `?`, ...)
    pub fn set_cmdline(&mut self, fragment: impl Into<Option<ConfigSchema>>, kinds: impl Into<Names>) {
        let fragment: Option<ConfigSchema> = fragment.into();
        let kinds: Names = kinds.into();
        for kind in kinds.iter() {
            self.layers
                .replace(&LayerKey::Cmdline(kind.to_string()), fragment.clone());
        }
    }

    /// Replace the onetime layer. It stays active until replaced by an empty
    /// fragment.
    pub fn set_onetime(&mut self, fragment: impl Into<Option<ConfigSchema>>) {
        self.layers.replace(&LayerKey::Onetime, fragment.into());
    }

    /// Deactivate the onetime layer
    pub fn reset_onetime(&mut self) {
        self.set_onetime(None);
    }

    /// The resolved configuration for the current host context.
    ///
    /// Repeated calls with no intervening write to a contributing layer return
    /// the same allocation without merging again.
    pub fn get(&self) -> Arc<ConfigSchema> {
        let plan = self.plan();
        let mut pending = Vec::new();

        let resolved = self.resolved.ensure(plan.cache_key(), || {
            tracing::debug!(
                mode = plan.mode.name(),
                layers = plan.layers.len(),
                "resolving configuration"
            );
            let layers: Vec<ConfigSchema> = plan
                .layers
                .iter()
                .map(|layer| ConfigSchema::clone(&self.normalized_layer(layer, &mut pending)))
                .collect();
            Arc::new(merge_all(layers))
        });

        self.emit(&pending);
        resolved
    }

    /// `enabled` (invoked if it is a function; absent or null counts as
    /// false) and the host reports a mode suitable for completion.
    pub fn is_enabled(&self) -> bool {
        let config = self.get();
        let enabled = match config.get("enabled") {
            None | Some(ConfigValue::Null) => false,
            Some(value) => match Flag::from_value(value) {
                Some(flag) => flag.evaluate(),
                None => value.is_truthy(),
            },
        };
        enabled && self.host.is_suitable_mode()
    }

    /// Configuration of the source called `name` in the resolved `sources`.
    ///
    /// # Errors
    ///
    /// [`Error::SourceNotFound`] if no source of that name is configured.
    pub fn source_config(&self, name: &str) -> Result<SourceConfig> {
        let config = self.get();
        config
            .sources()
            .into_iter()
            .flatten()
            .filter_map(SourceConfig::from_value)
            .find(|source| source.name == name)
            .ok_or_else(|| Error::SourceNotFound {
                name: name.to_string(),
            })
    }

    /// Whether `view.entries` selects the native menu, either as the string
    /// `"native"` or as a table whose `name` is `"native"`.
    pub fn is_native_menu(&self) -> bool {
        let config = self.get();
        match config.get_path("view.entries") {
            Some(ConfigValue::String(entries)) => entries == "native",
            Some(entries @ ConfigValue::Table(_)) => {
                entries.get("name").and_then(ConfigValue::as_str) == Some("native")
            }
            _ => false,
        }
    }

    /// Layer selection for the current host context
    pub fn plan(&self) -> Plan {
        Plan::select(&self.layers, self.host.as_ref())
    }

    pub fn revision(&self, key: &LayerKey) -> Revision {
        self.layers.revision(key)
    }

    pub fn layers(&self) -> &LayerStore {
        &self.layers
    }

    pub fn host(&self) -> &dyn HostContext {
        self.host.as_ref()
    }

    /// Hit/miss counters of the resolved-configuration cache
    pub fn cache_stats(&self) -> CacheStats {
        self.resolved.stats()
    }

    fn normalized_layer(&self, layer: &PlannedLayer, pending: &mut Vec<Notice>) -> Arc<ConfigSchema> {
        self.normalized
            .ensure(layer.key.cache_key(layer.revision), || {
                let normalized = self.normalizer.normalize(Some(&layer.schema));
                pending.extend(normalized.notices);
                Arc::new(normalized.schema)
            })
    }

    /// Record the stored (already normalized) schema of `key` as its own
    /// normalized form so it is not normalized a second time.
    fn prime_normalized(&self, key: &LayerKey) {
        if let Some(layer) = self.layers.get(key) {
            self.normalized
                .prime(key.cache_key(layer.revision), Arc::clone(&layer.schema));
        }
    }

    fn emit(&self, notices: &[Notice]) {
        for notice in notices {
            self.sink.emit(notice);
        }
    }
}
