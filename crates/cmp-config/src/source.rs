//! Typed view over one entry of the resolved `sources` sequence

use crate::schema::ConfigSchema;
use crate::value::{ConfigFn, ConfigValue, Table};

/// Configuration of a single completion source
#[derive(Debug, Clone, PartialEq)]
pub struct SourceConfig {
    /// Source name, the lookup key
    pub name: String,
    /// Source-specific options (always present after normalization)
    pub option: ConfigSchema,
    entry: Table,
}

impl SourceConfig {
    /// Read a source entry. `None` unless `value` is a table with a string `name`.
    pub fn from_value(value: &ConfigValue) -> Option<Self> {
        let entry = value.as_table()?;
        let name = entry.get("name")?.as_str()?.to_string();
        let option = entry
            .get("option")
            .and_then(ConfigValue::as_table)
            .cloned()
            .map(ConfigSchema::from)
            .unwrap_or_default();

        Some(Self {
            name,
            option,
            entry: entry.clone(),
        })
    }

    /// Raw field of the entry, e.g. `priority` or `keyword_length`
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.entry.get(key)
    }

    pub fn entry(&self) -> &Table {
        &self.entry
    }

    /// Override hook `override.<name>`, if one is installed
    pub fn hook(&self, name: &str) -> Option<&ConfigFn> {
        self.entry
            .get("override")
            .and_then(|overrides| overrides.get(name))
            .and_then(ConfigValue::as_function)
    }

    /// Characters that trigger this source, from `override.get_trigger_characters`
    pub fn trigger_characters(&self) -> Option<Vec<String>> {
        let value = self.hook("get_trigger_characters")?.call();
        let characters = value
            .as_array()?
            .iter()
            .filter_map(|c| c.as_str().map(str::to_string))
            .collect();
        Some(characters)
    }

    /// Keyword pattern of this source, from `override.get_keyword_pattern`
    pub fn keyword_pattern(&self) -> Option<String> {
        self.hook("get_keyword_pattern")?
            .call()
            .as_str()
            .map(str::to_string)
    }
}
