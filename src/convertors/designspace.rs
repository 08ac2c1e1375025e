//! Edit-tree convertor for designspace (XML) documents.

use crate::node::{EditNode, NodeKind};
use crate::xml::{Document, Element};
use crate::UfoTreeError;

/// Walk a parsed document into an edit tree. Elements become `tag` nodes
/// carrying their trimmed text; attributes become `attribute` children,
/// placed before the element children.
pub fn build_edit_tree(document: &Document) -> EditNode {
    element_to_node(&document.root)
}

fn element_to_node(element: &Element) -> EditNode {
    let text = element.text.as_deref().map(str::trim).unwrap_or("");
    let mut node = EditNode::new(element.tag.as_str(), text, NodeKind::Tag);
    for (name, value) in &element.attrs {
        node.push(EditNode::new(name.as_str(), value.as_str(), NodeKind::Attribute));
    }
    for child in &element.children {
        node.push(element_to_node(child));
    }
    node
}

/// Walk an edited tree back into an XML document, pretty-printed. A node is
/// an element unless it has no children and is tagged `attribute`, in which
/// case it lands as an attribute on the enclosing element.
pub fn build_document(tree: &EditNode) -> Result<Document, UfoTreeError> {
    let mut root = node_to_element(tree);
    root.indent();
    Ok(Document::new(root))
}

fn node_to_element(node: &EditNode) -> Element {
    let mut element = Element::new(node.name.as_str());
    if !node.value.is_empty() {
        element.text = Some(node.value.clone());
    }
    for child in &node.children {
        if child.children.is_empty() && child.kind == NodeKind::Attribute {
            element.set_attr(child.name.as_str(), child.value.as_str());
        } else {
            element.push(node_to_element(child));
        }
    }
    element
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const DOC: &str = r#"<designspace format="4.1">
  <axes>
    <axis tag="wght" name="Weight" minimum="300" maximum="700" default="400"/>
  </axes>
  <sources>
    <source filename="Test-Light.ufo">
      <location>
        <dimension name="Weight" xvalue="300"/>
      </location>
    </source>
  </sources>
</designspace>"#;

    #[test]
    fn test_build_edit_tree_shape() {
        let document = Document::parse(DOC).unwrap();
        let tree = build_edit_tree(&document);
        assert_eq!(tree.name, "designspace");
        assert_eq!(tree.kind, NodeKind::Tag);
        // The format attribute precedes the element children
        assert_eq!(tree.children[0].name, "format");
        assert_eq!(tree.children[0].value, "4.1");
        assert_eq!(tree.children[0].kind, NodeKind::Attribute);
        let axes = &tree.children[1];
        assert_eq!(axes.name, "axes");
        let axis = &axes.children[0];
        assert_eq!(axis.children.len(), 5);
        assert!(axis
            .children
            .iter()
            .all(|child| child.kind == NodeKind::Attribute));
    }

    #[test]
    fn test_whitespace_text_is_trimmed() {
        let document = Document::parse("<root>\n  <child>  spaced  </child>\n</root>").unwrap();
        let tree = build_edit_tree(&document);
        assert_eq!(tree.value, "");
        assert_eq!(tree.children[0].value, "spaced");
    }

    #[test]
    fn test_attribute_node_with_children_stays_an_element() {
        let mut tree = EditNode::new("root", "", NodeKind::Tag);
        let mut odd = EditNode::new("odd", "", NodeKind::Attribute);
        odd.push(EditNode::new("name", "x", NodeKind::Attribute));
        tree.push(odd);
        let document = build_document(&tree).unwrap();
        assert_eq!(document.root.children.len(), 1);
        assert_eq!(document.root.children[0].tag.as_str(), "odd");
        assert_eq!(document.root.children[0].attr("name"), Some("x"));
    }

    #[test]
    fn test_roundtrip_is_pretty_printed() {
        let document = Document::parse(DOC).unwrap();
        let rebuilt = build_document(&build_edit_tree(&document)).unwrap();
        assert_eq!(rebuilt.to_string(), format!("{}\n{}", r#"<?xml version="1.0" encoding="UTF-8"?>"#, DOC));
    }
}
