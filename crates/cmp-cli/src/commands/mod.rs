//! Command implementations for cmp-cli

pub mod resolve;
pub mod source;
pub mod status;

pub use resolve::run_resolve;
pub use source::run_source;
pub use status::run_status;

use cmp_config::ConfigValue;

/// Flatten `value` into `(dotted path, rendered leaf)` pairs.
///
/// Sequence elements are addressed as `path[i]`. Empty tables and sequences
/// are kept as leaves so they stay visible.
pub(crate) fn leaves(prefix: &str, value: &ConfigValue, out: &mut Vec<(String, String)>) {
    match value {
        ConfigValue::Table(table) if !table.is_empty() => {
            for (key, child) in table {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                leaves(&path, child, out);
            }
        }
        ConfigValue::Array(items) if !items.is_empty() => {
            for (i, child) in items.iter().enumerate() {
                leaves(&format!("{}[{}]", prefix, i), child, out);
            }
        }
        ConfigValue::Function(_) => out.push((prefix.to_string(), "<function>".to_string())),
        leaf => out.push((prefix.to_string(), leaf.to_json().to_string())),
    }
}
