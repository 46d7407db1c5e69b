//! Fragment builders for tests.

use cmp_config::{ConfigSchema, ConfigValue};

/// Build a fragment from a JSON literal.
///
/// # Panics
///
/// If `value` is not a JSON object (or null).
pub fn fragment(value: serde_json::Value) -> ConfigSchema {
    ConfigSchema::try_from(ConfigValue::from(value))
        .expect("fragment: expected a JSON object")
}

/// A fragment exercising every deprecation shim once.
///
/// Normalizing it yields five notices: `experimental.native_menu`,
/// `documentation`, and `opts`, `trigger_characters`, `keyword_pattern` of
/// the `legacy` source.
pub fn legacy_fragment() -> ConfigSchema {
    fragment(serde_json::json!({
        "experimental": {"native_menu": true},
        "documentation": {"border": "rounded"},
        "sources": [{
            "name": "legacy",
            "opts": {"max_items": 5},
            "trigger_characters": ["."],
            "keyword_pattern": "\\k\\+"
        }]
    }))
}
