//! The styled result of loading a document.

use std::collections::BTreeMap;

use serde::Serialize;
use wren_dom::style::ComputedStyle;
use wren_dom::{Attribute, DomTree, NodeId, NodeType};
use wren_http::HttpResponse;

/// An element tree with computed styles, plus the response it came from.
#[derive(Debug, Clone)]
pub struct StyledDocument {
    response: Option<HttpResponse>,
    tree: DomTree,
}

impl StyledDocument {
    pub(crate) const fn new(response: Option<HttpResponse>, tree: DomTree) -> Self {
        Self { response, tree }
    }

    /// The styled tree.
    #[must_use]
    pub const fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Take the styled tree.
    #[must_use]
    pub fn into_tree(self) -> DomTree {
        self.tree
    }

    /// The response the document was decoded from, if it came over HTTP.
    #[must_use]
    pub const fn response(&self) -> Option<&HttpResponse> {
        self.response.as_ref()
    }

    /// Every element named `tag`, in document order.
    #[must_use]
    pub fn elements_by_tag_name(&self, tag: &str) -> Vec<NodeId> {
        self.tree
            .elements()
            .into_iter()
            .filter(|&id| {
                self.tree
                    .as_element(id)
                    .is_some_and(|data| data.tag_name.eq_ignore_ascii_case(tag))
            })
            .collect()
    }

    /// Computed style of element `id`.
    #[must_use]
    pub fn computed_style(&self, id: NodeId) -> Option<&ComputedStyle> {
        self.tree.as_element(id).map(|data| &data.computed_style)
    }

    /// The document as a JSON value: status, headers and the node tree with
    /// each element's computed style.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if serialization fails.
    pub fn to_json_value(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self.view())
    }

    /// [`to_json_value`](Self::to_json_value) rendered as pretty-printed text.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.view())
    }

    fn view(&self) -> DocumentView<'_> {
        DocumentView {
            status_code: self.response.as_ref().map(|r| r.status_code.as_str()),
            reason: self.response.as_ref().map(|r| r.reason.as_str()),
            headers: self.response.as_ref().map(|r| {
                r.headers
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.as_str()))
                    .collect()
            }),
            tree: node_view(&self.tree, NodeId::ROOT),
        }
    }
}

/// Serialized form of a document. Headers are sorted so output is stable.
#[derive(Serialize)]
struct DocumentView<'a> {
    status_code: Option<&'a str>,
    reason: Option<&'a str>,
    headers: Option<BTreeMap<&'a str, &'a str>>,
    tree: NodeView<'a>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum NodeView<'a> {
    Document {
        doctype: Option<&'a str>,
        children: Vec<NodeView<'a>>,
    },
    Element {
        tag: &'a str,
        attributes: &'a [Attribute],
        style: &'a ComputedStyle,
        children: Vec<NodeView<'a>>,
    },
    Text {
        data: &'a str,
    },
}

fn node_view(tree: &DomTree, id: NodeId) -> NodeView<'_> {
    let children = || {
        tree.children(id)
            .iter()
            .map(|&child| node_view(tree, child))
            .collect()
    };
    match tree.get(id).map(|node| &node.node_type) {
        Some(NodeType::Element(data)) => NodeView::Element {
            tag: &data.tag_name,
            attributes: &data.attrs,
            style: &data.computed_style,
            children: children(),
        },
        Some(NodeType::Text(data)) => NodeView::Text { data },
        Some(NodeType::Document) | None => NodeView::Document {
            doctype: tree.doctype(),
            children: children(),
        },
    }
}
