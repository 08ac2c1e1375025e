use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::value::ValueKind;
use crate::UfoTreeError;

/// Name given to the synthetic placeholder nodes that stand in for list
/// elements, keeping the tree displayable without losing element positions.
pub const LIST_ITEM: &str = "List Item";

/// The closed type-tag vocabulary of edit-tree nodes. `Tag` and `Attribute`
/// belong to the XML side; the rest name the runtime type of a plist value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Tag,
    Attribute,
    Str,
    Int,
    Float,
    Bool,
    Tuple,
    List,
    Dict,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Tag => "tag",
            NodeKind::Attribute => "attribute",
            NodeKind::Str => "str",
            NodeKind::Int => "int",
            NodeKind::Float => "float",
            NodeKind::Bool => "bool",
            NodeKind::Tuple => "tuple",
            NodeKind::List => "list",
            NodeKind::Dict => "dict",
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, NodeKind::Tuple | NodeKind::List | NodeKind::Dict)
    }

    /// The value type this tag declares, if it declares one. `Tag` and
    /// `Attribute` nodes carry plain text rather than a typed value.
    pub fn value_kind(&self) -> Option<ValueKind> {
        match self {
            NodeKind::Tag | NodeKind::Attribute => None,
            NodeKind::Str => Some(ValueKind::Str),
            NodeKind::Int => Some(ValueKind::Int),
            NodeKind::Float => Some(ValueKind::Float),
            NodeKind::Bool => Some(ValueKind::Bool),
            NodeKind::Tuple => Some(ValueKind::Tuple),
            NodeKind::List => Some(ValueKind::Array),
            NodeKind::Dict => Some(ValueKind::Dict),
        }
    }
}

impl From<ValueKind> for NodeKind {
    fn from(kind: ValueKind) -> Self {
        match kind {
            ValueKind::Str => NodeKind::Str,
            ValueKind::Int => NodeKind::Int,
            ValueKind::Float => NodeKind::Float,
            ValueKind::Bool => NodeKind::Bool,
            ValueKind::Tuple => NodeKind::Tuple,
            ValueKind::Array => NodeKind::List,
            ValueKind::Dict => NodeKind::Dict,
        }
    }
}

impl FromStr for NodeKind {
    type Err = UfoTreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tag" => Ok(NodeKind::Tag),
            "attribute" => Ok(NodeKind::Attribute),
            "str" => Ok(NodeKind::Str),
            "int" => Ok(NodeKind::Int),
            "float" => Ok(NodeKind::Float),
            "bool" => Ok(NodeKind::Bool),
            "tuple" => Ok(NodeKind::Tuple),
            "list" => Ok(NodeKind::List),
            "dict" => Ok(NodeKind::Dict),
            _ => Err(UfoTreeError::General(format!("Invalid type tag: {}", s))),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the edit tree: a name, a textual value, a type tag, and owned
/// children. Everything a generic tree widget needs and nothing more.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditNode {
    pub name: String,
    pub value: String,
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<EditNode>,
}

impl EditNode {
    pub fn new(name: impl Into<String>, value: impl Into<String>, kind: NodeKind) -> Self {
        EditNode {
            name: name.into(),
            value: value.into(),
            kind,
            children: Vec::new(),
        }
    }

    pub fn push(&mut self, child: EditNode) {
        self.children.push(child);
    }

    /// Whether this node renders as a folder.
    pub fn is_container(&self) -> bool {
        !self.children.is_empty()
    }

    /// Counts of (folder-like, leaf-like) children.
    pub fn child_summary(&self) -> (usize, usize) {
        let folders = self.children.iter().filter(|c| c.is_container()).count();
        (folders, self.children.len() - folders)
    }

    /// Status-line description of this node.
    pub fn describe(&self) -> String {
        if !self.children.is_empty() && self.kind != NodeKind::Attribute {
            let (tags, attributes) = self.child_summary();
            format!(
                "Tag <{}> with {} / {}",
                self.name,
                plural(tags, "tags"),
                plural(attributes, "attributes")
            )
        } else {
            format!("Attribute \"{}\"", self.name)
        }
    }
}

fn plural(count: usize, noun: &str) -> String {
    let noun = if count == 1 {
        noun.strip_suffix('s').unwrap_or(noun)
    } else {
        noun
    };
    format!("{} {}", count, noun)
}
