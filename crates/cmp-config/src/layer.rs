//! Revisioned layer storage
//!
//! Holds one global layer, the keyed override collections (per buffer, per
//! filetype, per command-line type) and the transient onetime layer. Every
//! write bumps the revision of the key it touches; revisions never go down.

use crate::cache::CacheKey;
use crate::context::BufferId;
use crate::schema::ConfigSchema;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Per-layer version counter, used only to build cache keys
pub type Revision = u64;

/// Revision of a layer that exists but was never written, and of a keyed
/// layer that has not been created yet.
pub const INITIAL_REVISION: Revision = 1;

/// Identifies one layer
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LayerKey {
    Global,
    Buffer(BufferId),
    Filetype(String),
    Cmdline(String),
    Onetime,
}

impl LayerKey {
    /// Collection name: `global`, `buffer`, `filetype`, `cmdline` or `onetime`
    pub fn kind(&self) -> &'static str {
        match self {
            LayerKey::Global => "global",
            LayerKey::Buffer(_) => "buffer",
            LayerKey::Filetype(_) => "filetype",
            LayerKey::Cmdline(_) => "cmdline",
            LayerKey::Onetime => "onetime",
        }
    }

    /// Key under which the normalized form of this layer at `revision` is memoized
    pub fn cache_key(&self, revision: Revision) -> CacheKey {
        let key = CacheKey::new(["layer", self.kind()]);
        let key = match self {
            LayerKey::Global | LayerKey::Onetime => key,
            LayerKey::Buffer(id) => key.with(*id),
            LayerKey::Filetype(name) | LayerKey::Cmdline(name) => key.with(name.as_str()),
        };
        key.with(revision)
    }
}

impl fmt::Display for LayerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerKey::Global | LayerKey::Onetime => f.write_str(self.kind()),
            LayerKey::Buffer(id) => write!(f, "buffer:{}", id),
            LayerKey::Filetype(name) | LayerKey::Cmdline(name) => {
                write!(f, "{}:{}", self.kind(), name)
            }
        }
    }
}

/// A stored fragment together with its revision
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub schema: Arc<ConfigSchema>,
    pub revision: Revision,
}

impl Layer {
    pub fn new(schema: ConfigSchema, revision: Revision) -> Self {
        Self {
            schema: Arc::new(schema),
            revision,
        }
    }

    fn initial(schema: ConfigSchema) -> Self {
        Self::new(schema, INITIAL_REVISION)
    }
}

/// One name or several, for setters that apply a fragment to many keys.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Names(Vec<String>);

impl Names {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Names {
    fn from(name: &str) -> Self {
        Self(vec![name.to_string()])
    }
}

impl From<String> for Names {
    fn from(name: String) -> Self {
        Self(vec![name])
    }
}

impl From<Vec<String>> for Names {
    fn from(names: Vec<String>) -> Self {
        Self(names)
    }
}

impl From<Vec<&str>> for Names {
    fn from(names: Vec<&str>) -> Self {
        Self(names.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Names {
    fn from(names: &[&str]) -> Self {
        Self(names.iter().map(|n| (*n).to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Names {
    fn from(names: [&str; N]) -> Self {
        Self(names.iter().map(|n| (*n).to_string()).collect())
    }
}

/// All configuration layers
#[derive(Debug, Clone)]
pub struct LayerStore {
    global: Layer,
    buffers: HashMap<BufferId, Layer>,
    filetypes: HashMap<String, Layer>,
    cmdline: HashMap<String, Layer>,
    onetime: Layer,
}

impl Default for LayerStore {
    fn default() -> Self {
        Self::new(ConfigSchema::new())
    }
}

impl LayerStore {
    /// Create a store whose global layer is `global` at the initial revision
    pub fn new(global: ConfigSchema) -> Self {
        Self {
            global: Layer::initial(global),
            buffers: HashMap::new(),
            filetypes: HashMap::new(),
            cmdline: HashMap::new(),
            onetime: Layer::initial(ConfigSchema::new()),
        }
    }

    pub fn global(&self) -> &Layer {
        &self.global
    }

    pub fn onetime(&self) -> &Layer {
        &self.onetime
    }

    /// Whether a onetime override is pending (any field set)
    pub fn has_onetime(&self) -> bool {
        !self.onetime.schema.is_empty()
    }

    /// The stored layer for `key`, `None` if it was never written
    pub fn get(&self, key: &LayerKey) -> Option<&Layer> {
        match key {
            LayerKey::Global => Some(&self.global),
            LayerKey::Onetime => Some(&self.onetime),
            LayerKey::Buffer(id) => self.buffers.get(id),
            LayerKey::Filetype(name) => self.filetypes.get(name),
            LayerKey::Cmdline(kind) => self.cmdline.get(kind),
        }
    }

    /// Current revision of `key`; [`INITIAL_REVISION`] for layers never written
    pub fn revision(&self, key: &LayerKey) -> Revision {
        self.get(key)
            .map(|layer| layer.revision)
            .unwrap_or(INITIAL_REVISION)
    }

    /// Replace the layer for `key` with `fragment` (empty if absent) and bump
    /// its revision. Returns the new revision.
    pub fn replace(&mut self, key: &LayerKey, fragment: Option<ConfigSchema>) -> Revision {
        let revision = self.revision(key) + 1;
        let layer = Layer::new(fragment.unwrap_or_default(), revision);

        match key {
            LayerKey::Global => self.global = layer,
            LayerKey::Onetime => self.onetime = layer,
            LayerKey::Buffer(id) => {
                self.buffers.insert(*id, layer);
            }
            LayerKey::Filetype(name) => {
                self.filetypes.insert(name.clone(), layer);
            }
            LayerKey::Cmdline(kind) => {
                self.cmdline.insert(kind.clone(), layer);
            }
        }

        tracing::debug!(layer = %key, revision, "layer replaced");
        revision
    }

    /// Number of keyed layers stored (buffers, filetypes and cmdline types)
    pub fn keyed_len(&self) -> usize {
        self.buffers.len() + self.filetypes.len() + self.cmdline.len()
    }
}
