//! Layer normalization
//!
//! Every layer passes through [`Normalizer::normalize`] before it is merged.
//! Normalization rewrites the `mapping` table through the key-notation and
//! binder collaborators, and runs the deprecation shims that migrate legacy
//! field shapes into their canonical replacements:
//!
//! | legacy                          | canonical                               |
//! |---------------------------------|-----------------------------------------|
//! | `experimental.native_menu`      | `view.entries = "native"`               |
//! | `documentation`                 | `window.documentation`                  |
//! | `sources[i].opts`               | `sources[i].option`                     |
//! | `sources[i].trigger_characters` | `sources[i].override.get_trigger_characters` |
//! | `sources[i].keyword_pattern`    | `sources[i].override.get_keyword_pattern`    |
//!
//! Each triggered shim yields one [`Notice`] per call. Notices are returned
//! rather than emitted so the caller decides when the user sees them.

use crate::mapping::{KeyNormalizer, KeyNotation, MappingBinder, MappingMode, ModeBinder};
use crate::merge::merge_all;
use crate::notice::Notice;
use crate::schema::ConfigSchema;
use crate::value::{ConfigFn, ConfigValue, Table};

/// Output of a normalization pass
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Normalized {
    pub schema: ConfigSchema,
    pub notices: Vec<Notice>,
}

/// Rewrites raw layers into canonical form
pub struct Normalizer {
    keys: Box<dyn KeyNormalizer>,
    binder: Box<dyn MappingBinder>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(KeyNotation, ModeBinder)
    }
}

impl std::fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Normalizer").finish_non_exhaustive()
    }
}

impl Normalizer {
    /// Create a normalizer with custom mapping collaborators
    pub fn new(keys: impl KeyNormalizer + 'static, binder: impl MappingBinder + 'static) -> Self {
        Self {
            keys: Box::new(keys),
            binder: Box::new(binder),
        }
    }

    /// Normalize a raw layer. `None` is treated as an empty schema.
    ///
    /// The input is never modified; the result is idempotent in its schema
    /// (`normalize(normalize(x).schema).schema == normalize(x).schema`).
    pub fn normalize(&self, raw: Option<&ConfigSchema>) -> Normalized {
        let mut schema = raw.cloned().unwrap_or_default();
        let mut notices = Vec::new();

        self.normalize_mapping(&mut schema);
        migrate_native_menu(&mut schema, &mut notices);
        migrate_documentation(&mut schema, &mut notices);
        migrate_sources(&mut schema, &mut notices);

        Normalized { schema, notices }
    }

    /// Normalize each layer, then fold them lowest to highest precedence.
    pub fn resolve_layers<'a, I>(&self, layers: I) -> Normalized
    where
        I: IntoIterator<Item = &'a ConfigSchema>,
    {
        let mut notices = Vec::new();
        let schemas: Vec<ConfigSchema> = layers
            .into_iter()
            .map(|layer| {
                let normalized = self.normalize(Some(layer));
                notices.extend(normalized.notices);
                normalized.schema
            })
            .collect();

        Normalized {
            schema: merge_all(schemas),
            notices,
        }
    }

    /// Rewrite only the `mapping` table: canonical keys, actions bound to
    /// their modes. Emits no notices.
    pub(crate) fn normalize_mapping(&self, schema: &mut ConfigSchema) {
        let Some(ConfigValue::Table(mapping)) = schema.get_mut("mapping") else {
            return;
        };
        let raw = std::mem::take(mapping);
        *mapping = raw
            .into_iter()
            .map(|(key, action)| {
                (
                    self.keys.normalize(&key),
                    self.binder.bind(action, &[MappingMode::Insert]),
                )
            })
            .collect();
    }
}

fn deprecate(notices: &mut Vec<Notice>, old: &str, new: &str) {
    tracing::debug!(old, new, "deprecated field migrated");
    notices.push(Notice::deprecated(old, new));
}

fn is_set(value: Option<&ConfigValue>) -> bool {
    value.is_some_and(|v| !v.is_null())
}

fn migrate_native_menu(schema: &mut ConfigSchema, notices: &mut Vec<Notice>) {
    if !schema
        .get_path("experimental.native_menu")
        .is_some_and(ConfigValue::is_truthy)
    {
        return;
    }
    deprecate(notices, "experimental.native_menu", "view.entries");
    if !is_set(schema.get_path("view.entries")) {
        schema.set_path("view.entries", "native");
    }
}

fn migrate_documentation(schema: &mut ConfigSchema, notices: &mut Vec<Notice>) {
    let Some(documentation) = schema.get("documentation").filter(|v| !v.is_null()).cloned() else {
        return;
    };
    deprecate(notices, "documentation", "window.documentation");
    schema.set_path("window.documentation", documentation);
}

fn migrate_sources(schema: &mut ConfigSchema, notices: &mut Vec<Notice>) {
    let Some(ConfigValue::Array(sources)) = schema.get_mut("sources") else {
        return;
    };
    for source in sources.iter_mut() {
        if let ConfigValue::Table(entry) = source {
            migrate_source(entry, notices);
        }
    }
}

const LEGACY_HOOKS: [(&str, &str); 2] = [
    ("trigger_characters", "get_trigger_characters"),
    ("keyword_pattern", "get_keyword_pattern"),
];

fn migrate_source(entry: &mut Table, notices: &mut Vec<Notice>) {
    let name = entry
        .get("name")
        .and_then(ConfigValue::as_str)
        .unwrap_or("?")
        .to_string();

    if !is_set(entry.get("option")) && is_set(entry.get("opts")) {
        if let Some(opts) = entry.remove("opts") {
            deprecate(
                notices,
                &format!("sources[{}].opts", name),
                &format!("sources[{}].option", name),
            );
            entry.insert("option".to_string(), opts);
        }
    }
    if !is_set(entry.get("option")) {
        entry.insert("option".to_string(), ConfigValue::Table(Table::new()));
    }

    for (legacy, hook) in LEGACY_HOOKS {
        let Some(value) = entry.get(legacy).filter(|v| !v.is_null()).cloned() else {
            continue;
        };
        deprecate(
            notices,
            &format!("sources[{}].{}", name, legacy),
            &format!("sources[{}].override.{}", name, hook),
        );

        let overrides = entry
            .entry("override".to_string())
            .or_insert_with(|| ConfigValue::Table(Table::new()));
        // Only install the compatibility hook when the user has not defined one
        if let ConfigValue::Table(overrides) = overrides {
            if !is_set(overrides.get(hook)) {
                overrides.insert(
                    hook.to_string(),
                    ConfigValue::Function(ConfigFn::constant(value)),
                );
            }
        }
    }
}
