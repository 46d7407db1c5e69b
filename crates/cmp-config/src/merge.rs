//! Structural merge of configuration fragments
//!
//! Merge semantics, overlay wins on conflict:
//! - Tables: deep-merge by key (recursive)
//! - Arrays: REPLACE (overlay wins entirely, never concatenated)
//! - Scalars and functions: overlay wins
//! - Null overlay: treated as absent, the base value is kept

use crate::schema::ConfigSchema;
use crate::value::{ConfigValue, Table};

/// Deep merge two values, `overlay` taking precedence.
pub fn deep_merge(base: ConfigValue, overlay: ConfigValue) -> ConfigValue {
    match (base, overlay) {
        (ConfigValue::Table(base_map), ConfigValue::Table(overlay_map)) => {
            ConfigValue::Table(merge_tables(base_map, overlay_map))
        }

        // Absent in the overlay: keep whatever the base had
        (base, ConfigValue::Null) => base,

        // Shape change to a table: nulls inside it are still absent
        (_, ConfigValue::Table(overlay_map)) => {
            ConfigValue::Table(merge_tables(Table::new(), overlay_map))
        }

        // Arrays, scalars, functions and other shape changes: overlay wins
        (_, overlay) => overlay,
    }
}

fn merge_tables(mut base: Table, overlay: Table) -> Table {
    for (key, overlay_value) in overlay {
        let merged = match base.remove(&key) {
            Some(base_value) => deep_merge(base_value, overlay_value),
            None => match overlay_value {
                ConfigValue::Null => continue,
                ConfigValue::Table(overlay_map) => {
                    ConfigValue::Table(merge_tables(Table::new(), overlay_map))
                }
                value => value,
            },
        };
        base.insert(key, merged);
    }
    base
}

/// Merge two schemas, `overlay` taking precedence.
pub fn merge_schemas(base: ConfigSchema, overlay: ConfigSchema) -> ConfigSchema {
    ConfigSchema::from(merge_tables(base.into_table(), overlay.into_table()))
}

/// Fold schemas left to right; the last one has the highest precedence.
pub fn merge_all<I>(layers: I) -> ConfigSchema
where
    I: IntoIterator<Item = ConfigSchema>,
{
    layers.into_iter().fold(ConfigSchema::new(), merge_schemas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn schema(value: serde_json::Value) -> ConfigSchema {
        ConfigSchema::try_from(ConfigValue::from(value)).unwrap()
    }

    #[test]
    fn test_scalar_override() {
        let result = merge_schemas(schema(json!({"a": 1})), schema(json!({"a": 2})));
        assert_eq!(result.to_json(), json!({"a": 2}));
    }

    #[test]
    fn test_table_deep_merge() {
        let base = schema(json!({"window": {"completion": {"border": "none", "zindex": 10}}}));
        let overlay = schema(json!({"window": {"completion": {"border": "rounded"}}}));

        let result = merge_schemas(base, overlay);

        assert_eq!(
            result.to_json(),
            json!({"window": {"completion": {"border": "rounded", "zindex": 10}}})
        );
    }

    #[test]
    fn test_array_replace() {
        let base = schema(json!({"sources": [{"name": "a"}, {"name": "b"}]}));
        let overlay = schema(json!({"sources": [{"name": "c"}]}));

        let result = merge_schemas(base, overlay);

        assert_eq!(result.to_json(), json!({"sources": [{"name": "c"}]}));
    }

    #[test]
    fn test_null_overlay_keeps_base() {
        let result = merge_schemas(schema(json!({"a": 1})), schema(json!({"a": null, "b": 2})));
        assert_eq!(result.to_json(), json!({"a": 1, "b": 2}));
    }

    #[test]
    fn test_null_overlay_never_creates_key() {
        let result = merge_schemas(
            schema(json!({"view": {"entries": "custom"}})),
            schema(json!({"enabled": null, "view": {"docs": null}, "window": {"completion": null}})),
        );
        assert_eq!(
            result.to_json(),
            json!({"view": {"entries": "custom"}, "window": {}})
        );
        assert_eq!(result.get("enabled"), None);
    }

    #[test]
    fn test_null_overlay_dropped_on_shape_change() {
        let result = merge_schemas(
            schema(json!({"view": "flat"})),
            schema(json!({"view": {"entries": "native", "docs": null}})),
        );
        assert_eq!(result.to_json(), json!({"view": {"entries": "native"}}));
    }

    #[test]
    fn test_function_replaces_scalar() {
        let mut overlay = ConfigSchema::new();
        let hook = ConfigValue::function(|| ConfigValue::Bool(false));
        overlay.insert("enabled", hook.clone());

        let result = merge_schemas(schema(json!({"enabled": true})), overlay);

        assert_eq!(result.get("enabled"), Some(&hook));
    }

    #[test]
    fn test_shape_change_overlay_wins() {
        let result = merge_schemas(
            schema(json!({"view": {"entries": "custom"}})),
            schema(json!({"view": "flat"})),
        );
        assert_eq!(result.to_json(), json!({"view": "flat"}));
    }

    #[test]
    fn test_merge_all_precedence() {
        let result = merge_all([
            schema(json!({"a": 1, "b": 1})),
            schema(json!({"b": 2})),
            schema(json!({"b": 3, "c": 3})),
        ]);
        assert_eq!(result.to_json(), json!({"a": 1, "b": 3, "c": 3}));
    }
}
