//! Element tree for the Wren pipeline.
//!
//! This crate provides an arena-based tree following the node model of the
//! [DOM Living Standard](https://dom.spec.whatwg.org/), reduced to what the
//! pipeline needs: one document root, elements, and text runs.
//!
//! # Design
//!
//! Nodes live in a single vector and refer to each other through [`NodeId`]
//! indices. Children are only ever appended, so the tree is acyclic by
//! construction and a parent link never changes once set.

pub mod style;

use std::fmt::Write as _;

use serde::Serialize;

pub use style::{ComputedStyle, DeclaredValue, Specificity};

/// A type-safe index into the tree.
///
/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The document node is always at index 0.
    pub const ROOT: Self = Self(0);
}

/// [§ 4.9.2 Interface Attr](https://dom.spec.whatwg.org/#interface-attr)
///
/// A name/value pair on an element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    /// Attribute name, lowercased by the tokenizer.
    pub name: String,
    /// Attribute value, verbatim.
    pub value: String,
}

impl Attribute {
    /// Create a new attribute with the given name and value.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// A single arena slot.
#[derive(Debug, Clone)]
pub struct Node {
    /// What kind of node this is, with its payload.
    pub node_type: NodeType,
    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-parent)
    /// `None` only for the document node.
    pub parent: Option<NodeId>,
    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-child)
    /// Children in insertion order.
    pub children: Vec<NodeId>,
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Each node has an associated node type"
#[derive(Debug, Clone)]
pub enum NodeType {
    /// The implicit root every parsed document hangs from.
    Document,
    /// [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element)
    Element(ElementData),
    /// [§ 4.10 Interface Text](https://dom.spec.whatwg.org/#interface-text)
    Text(String),
}

/// Element-specific data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    /// "An element's local name", lowercase.
    pub tag_name: String,
    /// Attributes in source order. Names are unique.
    pub attrs: Vec<Attribute>,
    /// Property values resolved for this element by the style resolver.
    pub computed_style: ComputedStyle,
}

impl ElementData {
    /// Create an unstyled element.
    #[must_use]
    pub fn new(tag_name: impl Into<String>, attrs: Vec<Attribute>) -> Self {
        Self {
            tag_name: tag_name.into(),
            attrs,
            computed_style: ComputedStyle::new(),
        }
    }

    /// Value of the attribute called `name`, if present.
    #[must_use]
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    /// Returns the element's `id` attribute value if present.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.get_attribute("id")
    }

    /// Returns the raw `class` attribute value if present.
    ///
    /// The value is not split into tokens; class selectors compare against
    /// the whole attribute.
    #[must_use]
    pub fn class(&self) -> Option<&str> {
        self.get_attribute("class")
    }
}

/// Arena-based element tree.
///
/// [§ 4 Nodes](https://dom.spec.whatwg.org/#nodes)
///
/// The document node always sits at [`NodeId::ROOT`].
#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<Node>,
    doctype: Option<String>,
}

impl DomTree {
    /// Create a tree holding only the document node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                node_type: NodeType::Document,
                parent: None,
                children: Vec::new(),
            }],
            doctype: None,
        }
    }

    /// The document node ID.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get a mutable reference to a node by its ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Number of nodes, the document node included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: the document node is never removed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Name from the `<!DOCTYPE>` declaration, if the document had one.
    #[must_use]
    pub fn doctype(&self) -> Option<&str> {
        self.doctype.as_deref()
    }

    /// Record the document's doctype name.
    pub fn set_doctype(&mut self, name: impl Into<String>) {
        self.doctype = Some(name.into());
    }

    /// [§ 4.2.2 Append](https://dom.spec.whatwg.org/#concept-node-append)
    ///
    /// Create a node and append it as the last child of `parent`.
    ///
    /// Returns `None` if `parent` does not exist.
    pub fn append(&mut self, parent: NodeId, node_type: NodeType) -> Option<NodeId> {
        if parent.0 >= self.nodes.len() {
            return None;
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            node_type,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        Some(id)
    }

    /// Append `c` to the text node `id`. Does nothing if `id` is not text.
    pub fn push_text(&mut self, id: NodeId, c: char) {
        if let Some(Node {
            node_type: NodeType::Text(data),
            ..
        }) = self.nodes.get_mut(id.0)
        {
            data.push(c);
        }
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Iterate over all ancestors of a node, from parent to root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// The element ancestors of `id`, ordered from the outermost down to the
    /// parent. The document node is not an element and is never included.
    #[must_use]
    pub fn ancestor_chain(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain: Vec<NodeId> = self
            .ancestors(id)
            .filter(|&a| self.as_element(a).is_some())
            .collect();
        chain.reverse();
        chain
    }

    /// Every element in document (pre-)order.
    #[must_use]
    pub fn elements(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![NodeId::ROOT];
        while let Some(id) = stack.pop() {
            if self.as_element(id).is_some() {
                out.push(id);
            }
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    /// Get element data if this node is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Get mutable element data if this node is an element.
    pub fn as_element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id).and_then(|n| match &mut n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Get text content if this node is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// [§ 4.4 textContent](https://dom.spec.whatwg.org/#dom-node-textcontent)
    ///
    /// Concatenation of every descendant text run, in tree order.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(text) = self.as_text(current) {
                out.push_str(text);
            }
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    /// Indented, one-node-per-line rendering of the tree for debugging and
    /// test assertions.
    ///
    /// ```text
    /// #document
    ///   <a id="x">
    ///     "hi"
    /// ```
    #[must_use]
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_node(NodeId::ROOT, 0, &mut out);
        out
    }

    fn dump_node(&self, id: NodeId, depth: usize, out: &mut String) {
        let Some(node) = self.get(id) else { return };
        let indent = "  ".repeat(depth);
        let _ = match &node.node_type {
            NodeType::Document => writeln!(out, "{indent}#document"),
            NodeType::Element(data) => {
                let attrs: String = data
                    .attrs
                    .iter()
                    .map(|a| format!(" {}=\"{}\"", a.name, a.value))
                    .collect();
                writeln!(out, "{indent}<{}{attrs}>", data.tag_name)
            }
            NodeType::Text(text) => writeln!(out, "{indent}{text:?}"),
        };
        for &child in &node.children {
            self.dump_node(child, depth + 1, out);
        }
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over ancestors of a node, nearest first.
pub struct AncestorIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}
