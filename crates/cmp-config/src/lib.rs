//! Layered configuration resolution for completion engines
//!
//! This crate resolves one flat configuration per query from a stack of
//! configuration layers, choosing the stack from the host's current
//! execution context:
//!
//! - **Layer store**: one global layer, per-buffer, per-filetype and
//!   per-command-line-type layers, and a transient onetime layer, each with a
//!   monotonically increasing revision
//! - **Context resolution**: onetime override, command-line mode, or the
//!   default `global < filetype < buffer` stack
//! - **Normalization**: mapping canonicalization and deprecation shims that
//!   migrate legacy fields, reporting each migration to the user
//! - **Revision cache**: memoized results keyed by context identity and layer
//!   revisions, so repeated queries between edits never merge again
//!
//! The crate is agnostic to which options exist. It only knows how to merge,
//! cache and normalize whatever fields are present.
//!
//! # Example
//!
//! ```
//! use cmp_config::{ConfigSchema, ConfigStore, StaticContext};
//!
//! let mut store = ConfigStore::new(StaticContext::insert_mode(1, "lua"));
//! store.set_global(ConfigSchema::from_json(r#"{"a": 1, "b": 1}"#).unwrap());
//! store.set_filetype(ConfigSchema::from_json(r#"{"b": 2}"#).unwrap(), "lua");
//! store.set_buffer(ConfigSchema::from_json(r#"{"b": 3, "c": 3}"#).unwrap(), 1);
//!
//! let config = store.get();
//! assert_eq!(config.to_json(), serde_json::json!({"a": 1, "b": 3, "c": 3}));
//! ```

pub mod cache;
pub mod context;
pub mod error;
pub mod layer;
pub mod mapping;
pub mod merge;
pub mod normalize;
pub mod notice;
pub mod resolve;
pub mod schema;
pub mod source;
pub mod store;
pub mod value;

pub use cache::{CacheKey, CacheStats, CacheToken, RevisionCache};
pub use context::{BufferId, HostContext, StaticContext};
pub use error::{Error, Result};
pub use layer::{INITIAL_REVISION, Layer, LayerKey, LayerStore, Names, Revision};
pub use mapping::{KeyNormalizer, KeyNotation, MappingBinder, MappingMode, ModeBinder};
pub use merge::{deep_merge, merge_all, merge_schemas};
pub use normalize::{Normalized, Normalizer};
pub use notice::{BufferedSink, Notice, NoticeChunk, NoticeSink, NoticeStyle, TracingSink};
pub use resolve::{Plan, PlannedLayer, ResolveMode};
pub use schema::ConfigSchema;
pub use source::SourceConfig;
pub use store::{ConfigStore, ConfigStoreBuilder};
pub use value::{ConfigFn, ConfigValue, Flag, Table};
