//! One document-processing session.

use wren_common::Limits;
use wren_css::{CssRuleStore, StyleResolver, extract_style_content};
use wren_dom::DomTree;
use wren_http::ResponseParser;

use crate::document::StyledDocument;
use crate::error::LoadError;

/// Owns everything needed to turn responses into styled trees: the limits
/// every engine enforces and the stylesheets preloaded with
/// [`collect_css_rules`](Self::collect_css_rules).
///
/// Each load works on its own copy of the preloaded rules, extended with the
/// document's `<style>` sheets. Nothing a document contains leaks into the
/// next load. Preloaded rules come before `<style>` rules, so they win
/// specificity ties.
#[derive(Debug, Clone, Default)]
pub struct DocumentSession {
    limits: Limits,
    rules: CssRuleStore,
}

impl DocumentSession {
    /// Create a session with default [`Limits`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session enforcing `limits`.
    #[must_use]
    pub fn with_limits(limits: Limits) -> Self {
        Self {
            limits,
            rules: CssRuleStore::new(),
        }
    }

    /// Limits applied to every parse in this session.
    #[must_use]
    pub const fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Preloaded rules.
    #[must_use]
    pub const fn rules(&self) -> &CssRuleStore {
        &self.rules
    }

    /// Add the rules of `stylesheet` to every later load.
    pub fn collect_css_rules(&mut self, stylesheet: &str) {
        self.rules.collect_css_rules(stylesheet);
    }

    /// Decode a raw HTTP/1.1 response and load its body as HTML.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Http`] for a malformed response,
    /// [`LoadError::MissingBody`] when the status forbids a body, and
    /// [`LoadError::Html`] for a body that fails to parse.
    pub fn load_response(&self, raw: &[u8]) -> Result<StyledDocument, LoadError> {
        let mut parser = ResponseParser::with_limits(self.limits);
        parser.receive_bytes(raw)?;
        if !parser.is_finished() {
            parser.finish()?;
        }
        let response = parser.into_response()?;
        tracing::debug!(
            status = %response.status_code,
            headers = response.headers.len(),
            "response decoded"
        );

        let Some(body) = response.body.as_deref() else {
            return Err(LoadError::MissingBody {
                status: response.status_code,
            });
        };
        let tree = self.build_tree(body)?;
        Ok(StyledDocument::new(Some(response), tree))
    }

    /// Parse `html`, collect its `<style>` sheets and resolve styles.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Html`] if the document fails to parse.
    pub fn load_html(&self, html: &str) -> Result<StyledDocument, LoadError> {
        let tree = self.build_tree(html)?;
        Ok(StyledDocument::new(None, tree))
    }

    /// Re-apply the preloaded rules to `tree`. Already resolved properties
    /// keep their values unless a more specific rule now matches.
    pub fn resolve(&self, tree: &mut DomTree) {
        StyleResolver::new(&self.rules).resolve_tree(tree);
    }

    fn build_tree(&self, html: &str) -> Result<DomTree, LoadError> {
        let mut tree = wren_html::parse_document_with_limits(html, self.limits)?;
        let mut rules = self.rules.clone();
        for stylesheet in extract_style_content(&tree) {
            rules.collect_css_rules(&stylesheet);
        }
        tracing::debug!(
            preloaded = self.rules.len(),
            total = rules.len(),
            "document rules collected"
        );
        StyleResolver::new(&rules).resolve_tree(&mut tree);
        Ok(tree)
    }
}
