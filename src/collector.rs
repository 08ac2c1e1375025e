use smol_str::SmolStr;

use crate::literal;
use crate::node::NodeKind;
use crate::value::{Dict, Value};
use crate::UfoTreeError;

/// A single exported result: the value, paired with the entry name it
/// contributes under when its parent builds a dict. Unnamed results
/// contribute as bare sequence elements.
pub type Exported = (Option<SmolStr>, Value);

/// Export-time accumulator for one edit-tree node: re-derives a typed value
/// from the node's declared type, its raw text, and the already-exported
/// results of its children. Created per node, consumed by [`Collector::export`].
#[derive(Debug)]
pub struct Collector {
    name: Option<SmolStr>,
    raw: String,
    declared: Option<NodeKind>,
    children: Vec<Exported>,
}

impl Collector {
    pub fn new(name: Option<&str>, raw: &str, declared: Option<NodeKind>) -> Self {
        Collector {
            name: name.map(SmolStr::from),
            raw: raw.to_string(),
            declared,
            children: Vec::new(),
        }
    }

    pub fn push(&mut self, child: Exported) {
        self.children.push(child);
    }

    /// Produce this node's typed value, in order of preference: a container
    /// built from collected children, a literal evaluation of the raw text
    /// (when `evaluate` is requested or no type is declared — parse failure
    /// degrades to the raw string, never an error), or a strict coercion
    /// into the declared type, which fails with
    /// [`UfoTreeError::TypeCoercion`] on mismatch.
    pub fn export(self, evaluate: bool) -> Result<Exported, UfoTreeError> {
        let Collector {
            name,
            raw,
            declared,
            children,
        } = self;
        let container = declared.is_some_and(|kind| kind.is_container());
        if !children.is_empty() && !container {
            log::warn!(
                "ignoring {} collected children of a scalar-typed value",
                children.len()
            );
        }
        let value = match declared {
            Some(kind) if container && !children.is_empty() => build_container(kind, children),
            // A pinned string type is kept verbatim: evaluating it could
            // only reinterpret text the user declared to be text.
            Some(NodeKind::Str) => Value::Str(raw),
            Some(kind) if !evaluate => coerce(kind, raw)?,
            _ => evaluate_raw(raw),
        };
        Ok((name, value))
    }
}

fn build_container(kind: NodeKind, children: Vec<Exported>) -> Value {
    match kind {
        NodeKind::Dict => {
            let mut entries = Dict::new();
            for (name, value) in children {
                match name {
                    Some(name) => {
                        entries.insert(name, value);
                    }
                    None => log::warn!("dropping an unnamed entry while building a dict"),
                }
            }
            Value::Dict(entries)
        }
        NodeKind::Tuple => Value::Tuple(children.into_iter().map(|(_, v)| v).collect()),
        _ => Value::Array(children.into_iter().map(|(_, v)| v).collect()),
    }
}

fn coerce(kind: NodeKind, raw: String) -> Result<Value, UfoTreeError> {
    let mismatch = |raw: &str| UfoTreeError::TypeCoercion {
        raw: raw.to_string(),
        target: kind.as_str(),
    };
    match kind {
        NodeKind::Str | NodeKind::Tag | NodeKind::Attribute => Ok(Value::Str(raw)),
        NodeKind::Int => raw
            .trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| mismatch(&raw)),
        NodeKind::Float => raw
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| mismatch(&raw)),
        NodeKind::Bool => match raw.trim() {
            "true" | "True" => Ok(Value::Bool(true)),
            "false" | "False" => Ok(Value::Bool(false)),
            _ => Err(mismatch(&raw)),
        },
        NodeKind::Tuple | NodeKind::List | NodeKind::Dict => {
            if raw.trim().is_empty() {
                Ok(empty_container(kind))
            } else {
                match literal::parse(&raw) {
                    Some(value) if NodeKind::from(value.kind()) == kind => Ok(value),
                    _ => Err(mismatch(&raw)),
                }
            }
        }
    }
}

fn empty_container(kind: NodeKind) -> Value {
    match kind {
        NodeKind::Dict => Value::Dict(Dict::new()),
        NodeKind::Tuple => Value::Tuple(Vec::new()),
        _ => Value::Array(Vec::new()),
    }
}

fn evaluate_raw(raw: String) -> Value {
    match literal::parse(&raw) {
        Some(value) => value,
        None => {
            log::debug!("raw value is not a literal, keeping as text: {:?}", raw);
            Value::Str(raw)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_coerce_pinned_int() {
        let collector = Collector::new(Some("x"), "5", Some(NodeKind::Int));
        let (name, value) = collector.export(false).unwrap();
        assert_eq!(name.unwrap(), "x");
        assert_eq!(value, Value::Int(5));
    }

    #[test]
    fn test_coerce_mismatch_is_an_error() {
        let collector = Collector::new(Some("x"), "not-a-number", Some(NodeKind::Int));
        let err = collector.export(false).unwrap_err();
        assert!(matches!(err, UfoTreeError::TypeCoercion { .. }));
    }

    #[test]
    fn test_evaluate_degrades_to_text() {
        let collector = Collector::new(Some("x"), "not-a-number", Some(NodeKind::Int));
        let (_, value) = collector.export(true).unwrap();
        assert_eq!(value, Value::Str("not-a-number".into()));
    }

    #[test]
    fn test_pinned_str_keeps_digit_text() {
        let collector = Collector::new(Some("styleName"), "500", Some(NodeKind::Str));
        let (_, value) = collector.export(true).unwrap();
        assert_eq!(value, Value::Str("500".into()));
    }

    #[test]
    fn test_untyped_evaluates_literal() {
        let collector = Collector::new(None, "[300, 700]", None);
        let (name, value) = collector.export(true).unwrap();
        assert!(name.is_none());
        assert_eq!(
            value,
            Value::Array(vec![Value::Int(300), Value::Int(700)])
        );
    }

    #[test]
    fn test_containers_compose_bottom_up() {
        let leaf = Collector::new(Some("int"), "5", Some(NodeKind::Int));
        let mut list = Collector::new(Some("list"), "", Some(NodeKind::List));
        list.push(leaf.export(false).unwrap());
        let mut dict = Collector::new(Some("dict"), "", Some(NodeKind::Dict));
        dict.push(list.export(false).unwrap());
        let (name, value) = dict.export(false).unwrap();
        assert_eq!(name.unwrap(), "dict");
        let entries = value.as_dict().unwrap();
        assert_eq!(entries["list"], Value::Array(vec![Value::Int(5)]));
    }

    #[test]
    fn test_dict_from_children_drops_unnamed() {
        let mut dict = Collector::new(Some("d"), "", Some(NodeKind::Dict));
        dict.push((Some("a".into()), Value::Int(1)));
        dict.push((None, Value::Int(2)));
        let (_, value) = dict.export(true).unwrap();
        assert_eq!(value.as_dict().unwrap().len(), 1);
    }

    #[test]
    fn test_sequence_from_children_ignores_names() {
        let mut list = Collector::new(None, "", Some(NodeKind::List));
        list.push((Some("List Item".into()), Value::Int(1)));
        list.push((None, Value::Int(2)));
        let (_, value) = list.export(true).unwrap();
        assert_eq!(value, Value::Array(vec![Value::Int(1), Value::Int(2)]));
    }

    #[test]
    fn test_empty_container_without_children() {
        let collector = Collector::new(Some("lib"), "", Some(NodeKind::Dict));
        let (_, value) = collector.export(false).unwrap();
        assert_eq!(value, Value::Dict(Dict::new()));
    }

    #[test]
    fn test_declared_container_parses_raw_literal() {
        let collector = Collector::new(Some("range"), "(300, 700)", Some(NodeKind::Tuple));
        let (_, value) = collector.export(false).unwrap();
        assert_eq!(
            value,
            Value::Tuple(vec![Value::Int(300), Value::Int(700)])
        );
    }
}
