//! Semi-structured configuration values
//!
//! Configuration fragments are open-ended: the resolver does not know which
//! options exist, only how to merge them. [`ConfigValue`] is the tagged union
//! every option value is stored as. Besides the usual JSON-like shapes it can
//! carry a [`ConfigFn`], a zero-argument callable that computes a value lazily
//! (for example an `enabled` predicate or a source override hook).

use serde::de::Deserializer;
use serde::ser::{SerializeMap, SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Ordered string-keyed map of values
pub type Table = BTreeMap<String, ConfigValue>;

/// A shared, zero-argument callable stored inside a configuration value.
///
/// Equality is identity: two `ConfigFn`s are equal only if they wrap the same
/// allocation. Cloning is cheap and preserves identity.
#[derive(Clone)]
pub struct ConfigFn(Arc<dyn Fn() -> ConfigValue + Send + Sync>);

impl ConfigFn {
    /// Wrap a closure
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() -> ConfigValue + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// A callable that always returns a clone of `value`
    pub fn constant(value: ConfigValue) -> Self {
        Self::new(move || value.clone())
    }

    /// Invoke the callable
    pub fn call(&self) -> ConfigValue {
        (self.0)()
    }
}

impl PartialEq for ConfigFn {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ConfigFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConfigFn({:p})", Arc::as_ptr(&self.0))
    }
}

/// A single configuration value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ConfigValue {
    /// Explicitly unset
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    /// Sequence; replaced wholesale on merge
    Array(Vec<ConfigValue>),
    /// Nested mapping; merged key-by-key
    Table(Table),
    /// Lazily computed value
    Function(ConfigFn),
}

impl ConfigValue {
    /// Build a `Function` value from a closure
    pub fn function<F>(f: F) -> Self
    where
        F: Fn() -> ConfigValue + Send + Sync + 'static,
    {
        Self::Function(ConfigFn::new(f))
    }

    /// Evaluate if callable: invokes a `Function`, returns anything else as-is.
    pub fn evaluate(&self) -> ConfigValue {
        match self {
            ConfigValue::Function(f) => f.call(),
            other => other.clone(),
        }
    }

    /// Lua-style truthiness: only `Null` and `false` are falsy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, ConfigValue::Null | ConfigValue::Bool(false))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ConfigValue::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ConfigValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<ConfigValue>> {
        match self {
            ConfigValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            ConfigValue::Table(table) => Some(table),
            _ => None,
        }
    }

    pub fn as_table_mut(&mut self) -> Option<&mut Table> {
        match self {
            ConfigValue::Table(table) => Some(table),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&ConfigFn> {
        match self {
            ConfigValue::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Look up `key` if this value is a table
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.as_table().and_then(|t| t.get(key))
    }

    /// Convert to JSON. Functions are rendered as the string `"<function>"`.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value;
        match self {
            ConfigValue::Null => Value::Null,
            ConfigValue::Bool(b) => Value::Bool(*b),
            ConfigValue::Integer(i) => Value::from(*i),
            ConfigValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            ConfigValue::String(s) => Value::String(s.clone()),
            ConfigValue::Array(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            ConfigValue::Table(table) => Value::Object(
                table
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            ConfigValue::Function(_) => Value::String("<function>".to_string()),
        }
    }
}

impl From<serde_json::Value> for ConfigValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => ConfigValue::Null,
            Value::Bool(b) => ConfigValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => ConfigValue::Integer(i),
                None => ConfigValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => ConfigValue::String(s),
            Value::Array(items) => ConfigValue::Array(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => {
                ConfigValue::Table(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        ConfigValue::Bool(b)
    }
}

impl From<i64> for ConfigValue {
    fn from(i: i64) -> Self {
        ConfigValue::Integer(i)
    }
}

impl From<f64> for ConfigValue {
    fn from(f: f64) -> Self {
        ConfigValue::Float(f)
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::String(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue::String(s)
    }
}

impl From<Vec<ConfigValue>> for ConfigValue {
    fn from(items: Vec<ConfigValue>) -> Self {
        ConfigValue::Array(items)
    }
}

impl From<Table> for ConfigValue {
    fn from(table: Table) -> Self {
        ConfigValue::Table(table)
    }
}

impl From<ConfigFn> for ConfigValue {
    fn from(f: ConfigFn) -> Self {
        ConfigValue::Function(f)
    }
}

impl Serialize for ConfigValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ConfigValue::Null => serializer.serialize_unit(),
            ConfigValue::Bool(b) => serializer.serialize_bool(*b),
            ConfigValue::Integer(i) => serializer.serialize_i64(*i),
            ConfigValue::Float(f) => serializer.serialize_f64(*f),
            ConfigValue::String(s) => serializer.serialize_str(s),
            ConfigValue::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            ConfigValue::Table(table) => {
                let mut map = serializer.serialize_map(Some(table.len()))?;
                for (k, v) in table {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            ConfigValue::Function(_) => serializer.serialize_str("<function>"),
        }
    }
}

impl<'de> Deserialize<'de> for ConfigValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(ConfigValue::from)
    }
}

/// A boolean option that may be computed lazily.
///
/// This is the typed view of fields such as `enabled`, which accept either a
/// plain boolean or a zero-argument predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Flag {
    Value(bool),
    Callable(ConfigFn),
}

impl Flag {
    /// Read a flag from a raw value. `None` for values that are neither a
    /// boolean nor a function.
    pub fn from_value(value: &ConfigValue) -> Option<Self> {
        match value {
            ConfigValue::Bool(b) => Some(Flag::Value(*b)),
            ConfigValue::Function(f) => Some(Flag::Callable(f.clone())),
            _ => None,
        }
    }

    /// Evaluate the flag, invoking the predicate if there is one
    pub fn evaluate(&self) -> bool {
        match self {
            Flag::Value(b) => *b,
            Flag::Callable(f) => f.call().is_truthy(),
        }
    }
}
