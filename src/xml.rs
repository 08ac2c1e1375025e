//! Owned XML document model.
//!
//! The element tree keeps what a round trip needs and nothing else: tag
//! names, attributes in document order, text, and the tail text following
//! each element. Parsing is bridged from [`roxmltree`]; serialization is
//! the `Display` impl. File handling stays with the caller.

use std::fmt;
use std::fmt::Write as _;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::UfoTreeError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub tag: SmolStr,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub attrs: IndexMap<SmolStr, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tail: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(tag: impl Into<SmolStr>) -> Self {
        Element {
            tag: tag.into(),
            ..Element::default()
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        self.attrs.insert(SmolStr::from(name), value.to_string());
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Rewrite text/tail whitespace so children appear one per line,
    /// indented two spaces per depth level. Leaf elements keep their text.
    pub fn indent(&mut self) {
        indent_children(self, 0, "  ");
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub root: Element,
}

impl Document {
    pub fn new(root: Element) -> Self {
        Document { root }
    }

    /// Parse XML text into the element model. Comments and processing
    /// instructions are dropped.
    pub fn parse(xml: &str) -> Result<Document, UfoTreeError> {
        let doc = roxmltree::Document::parse(xml)?;
        Ok(Document {
            root: from_node(doc.root_element()),
        })
    }

    /// See [`Element::indent`].
    pub fn indent(&mut self) {
        self.root.indent();
    }
}

fn from_node(node: roxmltree::Node<'_, '_>) -> Element {
    let mut element = Element::new(node.tag_name().name());
    for attribute in node.attributes() {
        element
            .attrs
            .insert(SmolStr::from(attribute.name()), attribute.value().to_string());
    }
    for child in node.children() {
        if child.is_element() {
            let mut converted = from_node(child);
            converted.tail = child
                .next_sibling()
                .filter(|sibling| sibling.is_text())
                .and_then(|sibling| sibling.text())
                .map(str::to_string);
            element.children.push(converted);
        } else if child.is_text() && element.children.is_empty() && element.text.is_none() {
            element.text = child.text().map(str::to_string);
        }
    }
    element
}

fn indent_children(element: &mut Element, depth: usize, indent: &str) {
    if element.children.is_empty() {
        return;
    }
    element.text = Some(format!("\n{}", indent.repeat(depth + 1)));
    let last = element.children.len() - 1;
    for (i, child) in element.children.iter_mut().enumerate() {
        indent_children(child, depth + 1, indent);
        let child_depth = if i == last { depth } else { depth + 1 };
        child.tail = Some(format!("\n{}", indent.repeat(child_depth)));
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        write!(f, "{}", self.root)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.tag)?;
        for (name, value) in &self.attrs {
            write!(f, " {}=\"", name)?;
            write_escaped(f, value, true)?;
            f.write_char('"')?;
        }
        if self.text.is_none() && self.children.is_empty() {
            f.write_str("/>")?;
        } else {
            f.write_char('>')?;
            if let Some(text) = &self.text {
                write_escaped(f, text, false)?;
            }
            for child in &self.children {
                write!(f, "{}", child)?;
            }
            write!(f, "</{}>", self.tag)?;
        }
        if let Some(tail) = &self.tail {
            write_escaped(f, tail, false)?;
        }
        Ok(())
    }
}

fn write_escaped(f: &mut fmt::Formatter<'_>, s: &str, in_attribute: bool) -> fmt::Result {
    for c in s.chars() {
        match c {
            '&' => f.write_str("&amp;")?,
            '<' => f.write_str("&lt;")?,
            '>' => f.write_str("&gt;")?,
            '"' if in_attribute => f.write_str("&quot;")?,
            _ => f.write_char(c)?,
        }
    }
    Ok(())
}
