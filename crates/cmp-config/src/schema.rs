//! Configuration fragments
//!
//! A [`ConfigSchema`] is an opaque, arbitrarily nested mapping from option name
//! to [`ConfigValue`]. The resolver never validates its shape: wrong-shaped
//! values are merged as-is and left for the consumer to interpret.

use crate::value::{ConfigValue, Table};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// A configuration fragment or a resolved configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigSchema(Table);

impl ConfigSchema {
    /// Create an empty schema
    pub fn new() -> Self {
        Self(Table::new())
    }

    /// Parse a schema from a JSON document. The top level must be an object.
    pub fn from_json(content: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(content)?;
        Self::try_from(ConfigValue::from(value))
    }

    /// Parse a schema from a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let schema: ConfigSchema = toml::from_str(content)?;
        Ok(schema)
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.0.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut ConfigValue> {
        self.0.get_mut(key)
    }

    /// Look up a dotted path through nested tables, e.g. `"view.entries"`.
    pub fn get_path(&self, path: &str) -> Option<&ConfigValue> {
        let mut segments = path.split('.');
        let mut current = self.0.get(segments.next()?)?;
        for segment in segments {
            current = current.get(segment)?;
        }
        Some(current)
    }

    /// Set a dotted path, creating intermediate tables as needed.
    ///
    /// A non-table value sitting on an intermediate segment is replaced by a
    /// table.
    pub fn set_path(&mut self, path: &str, value: impl Into<ConfigValue>) {
        let segments: Vec<&str> = path.split('.').collect();
        let Some((last, parents)) = segments.split_last() else {
            return;
        };

        let mut table = &mut self.0;
        for segment in parents {
            let entry = table
                .entry((*segment).to_string())
                .or_insert_with(|| ConfigValue::Table(Table::new()));
            if !matches!(entry, ConfigValue::Table(_)) {
                *entry = ConfigValue::Table(Table::new());
            }
            table = match entry {
                ConfigValue::Table(inner) => inner,
                _ => unreachable!("intermediate segment was just made a table"),
            };
        }
        table.insert((*last).to_string(), value.into());
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Option<ConfigValue> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<ConfigValue> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ConfigValue)> {
        self.0.iter()
    }

    /// The `sources` sequence, if present and shaped as an array
    pub fn sources(&self) -> Option<&Vec<ConfigValue>> {
        self.get("sources").and_then(ConfigValue::as_array)
    }

    pub fn as_table(&self) -> &Table {
        &self.0
    }

    pub fn into_table(self) -> Table {
        self.0
    }

    /// Render as JSON (functions become `"<function>"`)
    pub fn to_json(&self) -> serde_json::Value {
        ConfigValue::Table(self.0.clone()).to_json()
    }
}

impl From<Table> for ConfigSchema {
    fn from(table: Table) -> Self {
        Self(table)
    }
}

impl From<ConfigSchema> for ConfigValue {
    fn from(schema: ConfigSchema) -> Self {
        ConfigValue::Table(schema.0)
    }
}

impl TryFrom<ConfigValue> for ConfigSchema {
    type Error = Error;

    fn try_from(value: ConfigValue) -> Result<Self> {
        match value {
            ConfigValue::Table(table) => Ok(Self(table)),
            ConfigValue::Null => Ok(Self::new()),
            other => Err(Error::InvalidFragment {
                message: format!("expected a table at the top level, found {:?}", other),
            }),
        }
    }
}

impl<K: Into<String>, V: Into<ConfigValue>> FromIterator<(K, V)> for ConfigSchema {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn get_path_walks_nested_tables() {
        let schema = ConfigSchema::from_json(r#"{"view": {"entries": {"name": "native"}}}"#).unwrap();

        assert_eq!(
            schema.get_path("view.entries.name"),
            Some(&ConfigValue::from("native"))
        );
        assert_eq!(schema.get_path("view.missing"), None);
        assert_eq!(schema.get_path("view.entries.name.deeper"), None);
    }

    #[test]
    fn set_path_creates_intermediate_tables() {
        let mut schema = ConfigSchema::new();
        schema.insert("window", "not-a-table");
        schema.set_path("window.documentation.border", "rounded");
        schema.set_path("view.entries", "native");

        assert_eq!(
            schema.to_json(),
            serde_json::json!({
                "window": {"documentation": {"border": "rounded"}},
                "view": {"entries": "native"}
            })
        );
    }

    #[test]
    fn from_toml_parses_tables() {
        let schema = ConfigSchema::from_toml_str(
            r#"
preselect = "item"

[[sources]]
name = "buffer"
"#,
        )
        .unwrap();

        assert_eq!(schema.get("preselect"), Some(&ConfigValue::from("item")));
        assert_eq!(schema.sources().map(Vec::len), Some(1));
    }

    #[test]
    fn from_json_rejects_non_table_fragments() {
        let err = ConfigSchema::from_json("[1, 2]").unwrap_err();
        assert!(matches!(err, Error::InvalidFragment { .. }));
    }
}
