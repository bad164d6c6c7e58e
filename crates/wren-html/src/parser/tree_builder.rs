use wren_common::limits::DEFAULT_MAX_OPEN_ELEMENTS;
use wren_dom::{DomTree, ElementData, NodeId, NodeType};

use crate::error::HtmlErrorKind;
use crate::tokenizer::{Token, TokenSink};

/// Tag name reported by [`HtmlErrorKind::TagMismatch`] when only the
/// document itself is open.
const DOCUMENT_NAME: &str = "#document";

/// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
///
/// A reduced tree builder: no insertion modes, no implied tags, no
/// adoption agency. Every start tag opens an element under the current node
/// and every end tag must close exactly the current node.
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    /// DOM tree under construction. `NodeId::ROOT` is the Document node.
    tree: DomTree,

    /// [§ 13.2.4.3 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
    ///
    /// Starts with the document node, which is never popped.
    stack_of_open_elements: Vec<NodeId>,

    /// Text node that consecutive character tokens are appended to.
    current_text: Option<NodeId>,

    /// Elements (not counting the document) allowed open at once.
    max_open_elements: usize,

    saw_eof: bool,
}

impl TreeBuilder {
    /// Create a tree builder holding an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_open_elements(DEFAULT_MAX_OPEN_ELEMENTS)
    }

    /// Create a tree builder that rejects nesting deeper than `limit`.
    #[must_use]
    pub fn with_max_open_elements(limit: usize) -> Self {
        Self {
            tree: DomTree::new(),
            stack_of_open_elements: vec![NodeId::ROOT],
            current_text: None,
            max_open_elements: limit,
            saw_eof: false,
        }
    }

    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#current-node)
    ///
    /// "The current node is the bottommost node in this stack of open elements."
    #[must_use]
    pub fn current_node(&self) -> NodeId {
        self.stack_of_open_elements
            .last()
            .copied()
            .unwrap_or(NodeId::ROOT)
    }

    /// Number of elements currently open, not counting the document.
    #[must_use]
    pub fn open_element_count(&self) -> usize {
        self.stack_of_open_elements.len().saturating_sub(1)
    }

    /// Whether the end-of-file token has been processed.
    #[must_use]
    pub const fn saw_eof(&self) -> bool {
        self.saw_eof
    }

    /// The tree built so far.
    #[must_use]
    pub const fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Take the finished tree.
    #[must_use]
    pub fn into_tree(self) -> DomTree {
        self.tree
    }

    /// [§ 13.2.6.1 Insert a character](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-character)
    ///
    /// "If there is a Text node immediately before the adjusted insertion
    /// location, then append data to that Text node's data. Otherwise, create
    /// a new Text node ... and insert the newly created node at the adjusted
    /// insertion location."
    fn insert_character(&mut self, c: char) {
        if let Some(text) = self.current_text {
            self.tree.push_text(text, c);
            return;
        }
        let parent = self.current_node();
        self.current_text = self.tree.append(parent, NodeType::Text(c.to_string()));
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenSink for TreeBuilder {
    /// Apply one token to the tree.
    ///
    /// # Errors
    ///
    /// Returns [`HtmlErrorKind::TagMismatch`] for an end tag that does not
    /// close the current node and [`HtmlErrorKind::NestingTooDeep`] when a
    /// start tag would exceed the open-element limit.
    fn process_token(&mut self, token: Token) -> Result<(), HtmlErrorKind> {
        match token {
            Token::StartTag {
                name,
                self_closing,
                attributes,
            } => {
                if !self_closing && self.open_element_count() >= self.max_open_elements {
                    return Err(HtmlErrorKind::NestingTooDeep {
                        limit: self.max_open_elements,
                    });
                }
                let parent = self.current_node();
                let element = NodeType::Element(ElementData::new(name, attributes));
                if let Some(id) = self.tree.append(parent, element)
                    && !self_closing
                {
                    self.stack_of_open_elements.push(id);
                }
                self.current_text = None;
            }
            Token::EndTag { name, .. } => {
                let current = self.current_node();
                let expected = self
                    .tree
                    .as_element(current)
                    .map_or(DOCUMENT_NAME, |data| data.tag_name.as_str());
                if expected != name {
                    return Err(HtmlErrorKind::TagMismatch {
                        expected: expected.to_string(),
                        found: name,
                    });
                }
                let _ = self.stack_of_open_elements.pop();
                self.current_text = None;
            }
            Token::Character { data } => self.insert_character(data),
            Token::Doctype { name } => self.tree.set_doctype(name.unwrap_or_default()),
            // Comments are not kept in the tree.
            Token::Comment { .. } => {}
            Token::EndOfFile => {
                if self.open_element_count() > 0 {
                    tracing::warn!(
                        open = self.open_element_count(),
                        "end of input with elements still open"
                    );
                }
                self.saw_eof = true;
            }
        }
        Ok(())
    }
}
