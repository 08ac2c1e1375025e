//! Edit-tree convertor for property-list documents.
//!
//! A plist document arrives as a typed [`Value`] plus a caller-supplied
//! label (typically the filename). List elements have no name of their own,
//! so the set walk wraps each one in a placeholder node named
//! [`LIST_ITEM`]; the get walk recognizes the placeholder and lets the
//! element rejoin its list without gaining a dict key.

use crate::collector::{Collector, Exported};
use crate::node::{EditNode, NodeKind, LIST_ITEM};
use crate::value::Value;
use crate::UfoTreeError;

/// Walk a typed value into an edit tree rooted at `label`.
pub fn build_edit_tree(label: &str, value: &Value) -> EditNode {
    entry_to_node(label, value)
}

fn entry_to_node(name: &str, value: &Value) -> EditNode {
    let rendered = if is_folder(value) {
        String::new()
    } else {
        value.to_string()
    };
    let mut node = EditNode::new(name, rendered, NodeKind::from(value.kind()));
    match value {
        Value::Dict(entries) => {
            for (key, child) in entries {
                node.push(entry_to_node(key.as_str(), child));
            }
        }
        Value::Array(items) | Value::Tuple(items) => {
            for item in items {
                node.push(entry_to_node(LIST_ITEM, item));
            }
        }
        _ => {}
    }
    node
}

/// A container renders as a folder (with its text cleared) once any of its
/// elements is itself a container.
fn is_folder(value: &Value) -> bool {
    match value {
        Value::Dict(entries) => entries.values().any(Value::is_container),
        Value::Array(items) | Value::Tuple(items) => items.iter().any(Value::is_container),
        _ => false,
    }
}

/// Walk an edited tree back into a `(label, value)` pair, re-typing every
/// node bottom-up through a [`Collector`] with literal evaluation on, so
/// malformed text degrades to a string instead of aborting the export.
pub fn build_document(tree: &EditNode) -> Result<(String, Value), UfoTreeError> {
    let (name, value) = export_node(tree)?;
    Ok((name.map(|n| n.to_string()).unwrap_or_default(), value))
}

fn export_node(node: &EditNode) -> Result<Exported, UfoTreeError> {
    let name = if node.kind.is_container() && node.name == LIST_ITEM {
        None
    } else {
        Some(node.name.as_str())
    };
    let mut collector = Collector::new(name, &node.value, declared(node.kind));
    for child in &node.children {
        collector.push(export_node(child)?);
    }
    collector.export(true)
}

fn declared(kind: NodeKind) -> Option<NodeKind> {
    match kind {
        NodeKind::Tag | NodeKind::Attribute => None,
        other => Some(other),
    }
}
