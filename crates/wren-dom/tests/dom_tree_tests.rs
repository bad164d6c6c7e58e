//! Tests for tree construction helpers: append, ancestors, traversal, dump.

use wren_dom::{Attribute, DomTree, ElementData, NodeId, NodeType, Specificity};

/// Helper to append an element node and return its NodeId.
fn append_element(tree: &mut DomTree, parent: NodeId, tag: &str) -> NodeId {
    tree.append(parent, NodeType::Element(ElementData::new(tag, Vec::new())))
        .unwrap()
}

#[test]
fn test_new_tree_has_only_document() {
    let tree = DomTree::new();
    assert_eq!(tree.len(), 1);
    assert!(!tree.is_empty());
    assert_eq!(tree.root(), NodeId::ROOT);
    assert!(tree.children(NodeId::ROOT).is_empty());
    assert_eq!(tree.parent(NodeId::ROOT), None);
}

#[test]
fn test_append_sets_parent_and_order() {
    let mut tree = DomTree::new();
    let div = append_element(&mut tree, NodeId::ROOT, "div");
    let a = append_element(&mut tree, div, "a");
    let b = append_element(&mut tree, div, "b");

    assert_eq!(tree.children(div), &[a, b]);
    assert_eq!(tree.parent(a), Some(div));
    assert_eq!(tree.parent(div), Some(NodeId::ROOT));
}

#[test]
fn test_append_to_missing_parent_fails() {
    let mut tree = DomTree::new();
    let result = tree.append(NodeId(42), NodeType::Text(String::new()));
    assert_eq!(result, None);
    assert_eq!(tree.len(), 1);
}

#[test]
fn test_ancestor_chain_is_root_first_and_skips_document() {
    let mut tree = DomTree::new();
    let html = append_element(&mut tree, NodeId::ROOT, "html");
    let body = append_element(&mut tree, html, "body");
    let p = append_element(&mut tree, body, "p");

    assert_eq!(tree.ancestor_chain(p), vec![html, body]);
    assert_eq!(tree.ancestors(p).collect::<Vec<_>>(), vec![body, html, NodeId::ROOT]);
    assert!(tree.ancestor_chain(html).is_empty());
}

#[test]
fn test_elements_in_document_order() {
    let mut tree = DomTree::new();
    let div = append_element(&mut tree, NodeId::ROOT, "div");
    let p = append_element(&mut tree, div, "p");
    let _text = tree.append(p, NodeType::Text("x".to_string())).unwrap();
    let span = append_element(&mut tree, div, "span");
    let footer = append_element(&mut tree, NodeId::ROOT, "footer");

    assert_eq!(tree.elements(), vec![div, p, span, footer]);
}

#[test]
fn test_push_text_and_text_content() {
    let mut tree = DomTree::new();
    let p = append_element(&mut tree, NodeId::ROOT, "p");
    let text = tree.append(p, NodeType::Text(String::new())).unwrap();
    tree.push_text(text, 'h');
    tree.push_text(text, 'i');
    // Pushing text into an element is ignored.
    tree.push_text(p, '!');

    assert_eq!(tree.as_text(text), Some("hi"));
    assert_eq!(tree.text_content(NodeId::ROOT), "hi");
}

#[test]
fn test_attribute_lookup() {
    let element = ElementData::new(
        "a",
        vec![Attribute::new("id", "x"), Attribute::new("class", "big red")],
    );
    assert_eq!(element.id(), Some("x"));
    assert_eq!(element.class(), Some("big red"));
    assert_eq!(element.get_attribute("href"), None);
}

#[test]
fn test_computed_style_is_mutable_through_tree() {
    let mut tree = DomTree::new();
    let p = append_element(&mut tree, NodeId::ROOT, "p");
    tree.as_element_mut(p)
        .unwrap()
        .computed_style
        .set("color", "red", Specificity::new(0, 0, 0, 1));

    let style = &tree.as_element(p).unwrap().computed_style;
    assert_eq!(style.get("color"), Some("red"));
}

#[test]
fn test_dump_renders_nested_tree() {
    let mut tree = DomTree::new();
    let a = tree
        .append(
            NodeId::ROOT,
            NodeType::Element(ElementData::new("a", vec![Attribute::new("id", "x")])),
        )
        .unwrap();
    let _text = tree.append(a, NodeType::Text("hi".to_string())).unwrap();

    assert_eq!(tree.dump(), "#document\n  <a id=\"x\">\n    \"hi\"\n");
}

#[test]
fn test_doctype_recorded() {
    let mut tree = DomTree::new();
    assert_eq!(tree.doctype(), None);
    tree.set_doctype("html");
    assert_eq!(tree.doctype(), Some("html"));
}
