//! Dynamically shaped field values.
//!
//! The host framework hands validators whatever it extracted from the
//! configuration tree. [`FieldValue`] decides that shape once, at the
//! boundary, so every validator can match on the variants it accepts and
//! report a shape mismatch for the rest.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// An untyped configuration value.
///
/// Maps are ordered by key so diagnostics come out in the same order on
/// every run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<FieldValue>),
    Map(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    /// Short name of the variant, used in shape-mismatch messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Bool(_) => "bool",
            FieldValue::Int(_) => "integer",
            FieldValue::Float(_) => "float",
            FieldValue::Str(_) => "string",
            FieldValue::List(_) => "list",
            FieldValue::Map(_) => "map",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, FieldValue>> {
        match self {
            FieldValue::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Build a map value from `(key, value)` pairs.
    pub fn map<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        FieldValue::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => write!(f, "<nil>"),
            FieldValue::Bool(b) => write!(f, "{b}"),
            FieldValue::Int(i) => write!(f, "{i}"),
            FieldValue::Float(x) => write!(f, "{x}"),
            FieldValue::Str(s) => write!(f, "{s:?}"),
            FieldValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            FieldValue::Map(entries) => {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k:?}: {v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Str(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Str(s)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<i32> for FieldValue {
    fn from(i: i32) -> Self {
        FieldValue::Int(i64::from(i))
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<f64> for FieldValue {
    fn from(x: f64) -> Self {
        FieldValue::Float(x)
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(items: Vec<T>) -> Self {
        FieldValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<BTreeMap<String, FieldValue>> for FieldValue {
    fn from(m: BTreeMap<String, FieldValue>) -> Self {
        FieldValue::Map(m)
    }
}

fn from_number(n: &serde_json::Number) -> FieldValue {
    match n.as_i64() {
        Some(i) => FieldValue::Int(i),
        None => FieldValue::Float(n.as_f64().unwrap_or(f64::NAN)),
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => FieldValue::Null,
            serde_json::Value::Bool(b) => FieldValue::Bool(b),
            serde_json::Value::Number(n) => from_number(&n),
            serde_json::Value::String(s) => FieldValue::Str(s),
            serde_json::Value::Array(items) => {
                FieldValue::List(items.into_iter().map(FieldValue::from).collect())
            }
            serde_json::Value::Object(entries) => FieldValue::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, FieldValue::from(v)))
                    .collect(),
            ),
        }
    }
}

/// YAML keys that are not strings are rendered to their scalar text, the way a
/// configuration framework would see them after extraction.
fn yaml_key(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Null => "null".to_string(),
        other => FieldValue::from(other).to_string(),
    }
}

impl From<serde_yaml::Value> for FieldValue {
    fn from(value: serde_yaml::Value) -> Self {
        match value {
            serde_yaml::Value::Null => FieldValue::Null,
            serde_yaml::Value::Bool(b) => FieldValue::Bool(b),
            serde_yaml::Value::Number(n) => match n.as_i64() {
                Some(i) => FieldValue::Int(i),
                None => FieldValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_yaml::Value::String(s) => FieldValue::Str(s),
            serde_yaml::Value::Sequence(items) => {
                FieldValue::List(items.into_iter().map(FieldValue::from).collect())
            }
            serde_yaml::Value::Mapping(entries) => FieldValue::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (yaml_key(k), FieldValue::from(v)))
                    .collect(),
            ),
            serde_yaml::Value::Tagged(tagged) => FieldValue::from(tagged.value),
        }
    }
}

/// Reads any self-describing input through a YAML value, so map keys that
/// are not strings (`80: http`) are stringified the same way as in
/// [`From<serde_yaml::Value>`].
impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        serde_yaml::Value::deserialize(deserializer).map(FieldValue::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json() {
        let value = FieldValue::from(json!({"cpu": "500m", "pods": 10, "ratio": 0.5}));
        let map = value.as_map().expect("map");
        assert_eq!(map["cpu"], FieldValue::Str("500m".into()));
        assert_eq!(map["pods"], FieldValue::Int(10));
        assert_eq!(map["ratio"], FieldValue::Float(0.5));
    }

    #[test]
    fn test_from_yaml_stringifies_keys() {
        let yaml: serde_yaml::Value = serde_yaml::from_str("80: http\ntrue: yes\n").expect("yaml");
        let value = FieldValue::from(yaml);
        let map = value.as_map().expect("map");
        assert_eq!(map["80"], FieldValue::Str("http".into()));
        assert!(map.contains_key("true"));
    }

    #[test]
    fn test_deserialize_untagged() {
        let value: FieldValue = serde_json::from_str(r#"{"a": [1, "x", null]}"#).expect("json");
        assert_eq!(
            value,
            FieldValue::map([(
                "a",
                FieldValue::List(vec![FieldValue::Int(1), "x".into(), FieldValue::Null])
            )])
        );
    }

    #[test]
    fn test_deserialize_yaml_with_non_string_keys() {
        let value: FieldValue =
            serde_yaml::from_str("80: http\n443: https\ntrue: on\nname: web\n").expect("yaml");
        let map = value.as_map().expect("map");
        assert_eq!(map["80"], FieldValue::from("http"));
        assert_eq!(map["443"], FieldValue::from("https"));
        assert_eq!(map["true"], FieldValue::from("on"));
        assert_eq!(map["name"], FieldValue::from("web"));

        let nested: FieldValue = serde_yaml::from_str("ports: {8080: api}\n").expect("yaml");
        assert_eq!(
            nested,
            FieldValue::map([("ports", FieldValue::map([("8080", "api")]))])
        );
    }

    #[test]
    fn test_display_is_go_like() {
        assert_eq!(FieldValue::from("a\"b").to_string(), r#""a\"b""#);
        assert_eq!(FieldValue::Null.to_string(), "<nil>");
        assert_eq!(
            FieldValue::map([("k", FieldValue::Int(1))]).to_string(),
            r#"{"k": 1}"#
        );
    }
}
