use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::fmt::Write as _;
use std::hash::{Hash, Hasher};

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::query;
use crate::UfoTreeError;

/// An insertion-ordered mapping with unique keys. Sibling order is
/// significant and survives a round trip through the edit tree.
pub type Dict = IndexMap<SmolStr, Value>;

/// A typed value: the common currency between source documents and the
/// edit tree. Mappings and sequences nest arbitrarily; scalars are typed.
///
/// Tuples serialize as sequences and deserialize back as [`Value::Array`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Array(Vec<Value>),
    Dict(Dict),
    Tuple(Vec<Value>),
}

/// Runtime type tag of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Str,
    Int,
    Float,
    Bool,
    Tuple,
    Array,
    Dict,
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Str => "str",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Bool => "bool",
            ValueKind::Tuple => "tuple",
            ValueKind::Array => "list",
            ValueKind::Dict => "dict",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Str(_) => ValueKind::Str,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Bool(_) => ValueKind::Bool,
            Value::Tuple(_) => ValueKind::Tuple,
            Value::Array(_) => ValueKind::Array,
            Value::Dict(_) => ValueKind::Dict,
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Value::Tuple(_) | Value::Array(_) | Value::Dict(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) | Value::Tuple(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&Dict> {
        match self {
            Value::Dict(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_dict_mut(&mut self) -> Option<&mut Dict> {
        match self {
            Value::Dict(entries) => Some(entries),
            _ => None,
        }
    }

    /// The value at every occurrence of `key` anywhere below this value,
    /// including occurrences nested inside a value that itself matched.
    pub fn extract<'a>(&'a self, key: &'a str) -> query::Extract<'a> {
        query::extract(self, key)
    }

    /// Every mapping below this value owning an entry `key` (exact match)
    /// whose value matches `kind`, or any kind if `None`.
    pub fn find<'a>(&'a self, key: &'a str, kind: Option<ValueKind>) -> query::Find<'a> {
        query::find(self, key, kind)
    }

    /// Every mapping below this value containing an entry equal to `value`,
    /// optionally constrained to the entry name `key`.
    pub fn find_value<'a>(
        &'a self,
        value: &'a Value,
        key: Option<&'a str>,
    ) -> query::FindValue<'a> {
        query::find_value(self, value, key)
    }

    /// True iff any mapping below this value has an entry whose key includes
    /// `key` as a substring (unlike [`Value::find`], which matches exactly)
    /// and whose value matches `kind`.
    pub fn contains(&self, key: &str, kind: Option<ValueKind>) -> bool {
        query::contains(self, key, kind)
    }

    /// A hash over the value's structure: scalars by value, sequences in
    /// order, mappings independent of insertion order.
    pub fn structural_hash(&self) -> u64 {
        let mut state = DefaultHasher::new();
        self.write_structural(&mut state);
        state.finish()
    }

    fn write_structural<H: Hasher>(&self, state: &mut H) {
        match self {
            Value::Str(s) => {
                state.write_u8(0);
                s.hash(state);
            }
            Value::Int(n) => {
                state.write_u8(1);
                n.hash(state);
            }
            Value::Float(x) => {
                state.write_u8(2);
                OrderedFloat(*x).hash(state);
            }
            Value::Bool(b) => {
                state.write_u8(3);
                b.hash(state);
            }
            Value::Tuple(items) => {
                state.write_u8(4);
                state.write_usize(items.len());
                for item in items {
                    item.write_structural(state);
                }
            }
            Value::Array(items) => {
                state.write_u8(5);
                state.write_usize(items.len());
                for item in items {
                    item.write_structural(state);
                }
            }
            Value::Dict(entries) => {
                state.write_u8(6);
                state.write_u64(hash_dict(entries));
            }
        }
    }

    fn write_literal(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write_quoted(f, s),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => {
                // Keep a decimal point so the text re-evaluates as a float
                if x.is_finite() && x.fract() == 0.0 {
                    write!(f, "{:.1}", x)
                } else {
                    write!(f, "{}", x)
                }
            }
            Value::Bool(b) => write!(f, "{}", b),
            Value::Tuple(items) => write_sequence(f, items, '(', ')'),
            Value::Array(items) => write_sequence(f, items, '[', ']'),
            Value::Dict(entries) => {
                f.write_char('{')?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write_quoted(f, key.as_str())?;
                    f.write_str(": ")?;
                    value.write_literal(f)?;
                }
                f.write_char('}')
            }
        }
    }
}

/// Entry-wise hash of a mapping, commutative over entry order.
pub(crate) fn hash_dict(entries: &Dict) -> u64 {
    let mut acc = 0u64;
    for (key, value) in entries {
        let mut entry = DefaultHasher::new();
        key.hash(&mut entry);
        entry.write_u64(value.structural_hash());
        acc = acc.wrapping_add(entry.finish());
    }
    acc
}

fn write_sequence(f: &mut fmt::Formatter<'_>, items: &[Value], open: char, close: char) -> fmt::Result {
    f.write_char(open)?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        item.write_literal(f)?;
    }
    f.write_char(close)
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_char('"')?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            _ => f.write_char(c)?,
        }
    }
    f.write_char('"')
}

/// The textual rendering stored as an edit-tree node's raw value. Top-level
/// strings render bare; strings inside containers are quoted so the literal
/// parser can read the rendering back.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            other => other.write_literal(f),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Dict> for Value {
    fn from(entries: Dict) -> Self {
        Value::Dict(entries)
    }
}

impl TryFrom<serde_json::Value> for Value {
    type Error = UfoTreeError;

    fn try_from(v: serde_json::Value) -> Result<Self, Self::Error> {
        Ok(match v {
            serde_json::Value::Null => {
                return Err(UfoTreeError::UnsupportedShape {
                    found: "null".to_string(),
                })
            }
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or_default()),
            },
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(Value::try_from)
                    .collect::<Result<_, _>>()?,
            ),
            serde_json::Value::Object(entries) => Value::Dict(
                entries
                    .into_iter()
                    .map(|(k, v)| Ok((SmolStr::from(k), Value::try_from(v)?)))
                    .collect::<Result<Dict, UfoTreeError>>()?,
            ),
        })
    }
}

impl From<Value> for serde_json::Value {
    fn from(v: Value) -> Self {
        match v {
            Value::Str(s) => s.into(),
            Value::Int(n) => n.into(),
            Value::Float(x) => serde_json::Number::from_f64(x)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Bool(b) => b.into(),
            Value::Tuple(items) | Value::Array(items) => {
                serde_json::Value::Array(items.into_iter().map(Into::into).collect())
            }
            Value::Dict(entries) => serde_json::Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v.into()))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn fixture() -> Value {
        Value::try_from(json!({
            "familyName": "Test",
            "unitsPerEm": 1000,
            "italicAngle": -12.5,
            "guidelines": [{"x": 10, "y": 20}],
        }))
        .unwrap()
    }

    #[test]
    fn test_display_rendering() {
        assert_eq!(Value::Str("Regular".into()).to_string(), "Regular");
        assert_eq!(Value::Int(400).to_string(), "400");
        assert_eq!(Value::Float(2.0).to_string(), "2.0");
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(
            Value::Array(vec![Value::Int(1), Value::Str("a".into())]).to_string(),
            r#"[1, "a"]"#
        );
        assert_eq!(
            Value::Tuple(vec![Value::Int(1), Value::Int(2)]).to_string(),
            "(1, 2)"
        );
        let mut entries = Dict::new();
        entries.insert("weight".into(), Value::Int(400));
        assert_eq!(Value::Dict(entries).to_string(), r#"{"weight": 400}"#);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(Value::Int(1).kind().as_str(), "int");
        assert_eq!(Value::Array(vec![]).kind().as_str(), "list");
        assert_eq!(Value::Dict(Dict::new()).kind().as_str(), "dict");
        assert!(Value::Dict(Dict::new()).is_container());
        assert!(!Value::Str(String::new()).is_container());
    }

    #[test]
    fn test_json_glue_roundtrip() {
        let value = fixture();
        let json: serde_json::Value = value.clone().into();
        assert_eq!(Value::try_from(json).unwrap(), value);
    }

    #[test]
    fn test_json_null_is_unsupported() {
        let err = Value::try_from(json!({"a": null})).unwrap_err();
        assert!(matches!(err, UfoTreeError::UnsupportedShape { .. }));
    }

    #[test]
    fn test_serde_roundtrip() {
        let value = fixture();
        let text = serde_json::to_string(&value).unwrap();
        let back: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn test_structural_hash_ignores_dict_order() {
        let mut ab = Dict::new();
        ab.insert("a".into(), Value::Int(1));
        ab.insert("b".into(), Value::Int(2));
        let mut ba = Dict::new();
        ba.insert("b".into(), Value::Int(2));
        ba.insert("a".into(), Value::Int(1));
        assert_eq!(
            Value::Dict(ab).structural_hash(),
            Value::Dict(ba).structural_hash()
        );
    }

    #[test]
    fn test_structural_hash_respects_sequence_order() {
        let ab = Value::Array(vec![Value::Int(1), Value::Int(2)]);
        let ba = Value::Array(vec![Value::Int(2), Value::Int(1)]);
        assert_ne!(ab.structural_hash(), ba.structural_hash());
    }

    #[test]
    fn test_structural_hash_distinguishes_scalar_types() {
        assert_ne!(
            Value::Int(1).structural_hash(),
            Value::Str("1".into()).structural_hash()
        );
    }
}
