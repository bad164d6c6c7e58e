use wren_common::Limits;
use wren_dom::DomTree;

use super::tree_builder::TreeBuilder;
use crate::error::HtmlParseError;
use crate::tokenizer::{HTMLTokenizer, Token, TokenSink};

/// [§ 13.2 Parsing HTML documents](https://html.spec.whatwg.org/multipage/parsing.html#parsing)
///
/// Push parser joining the tokenizer to the tree builder. Characters can be
/// fed one at a time or in arbitrary slices; the tree is the same either
/// way.
///
/// The first error poisons the parser. Every later call returns that error
/// and no tree is produced.
#[derive(Debug, Clone)]
pub struct HTMLParser {
    tokenizer: HTMLTokenizer,
    builder: TreeBuilder,
    failure: Option<HtmlParseError>,
}

impl HTMLParser {
    /// Create a parser with default [`Limits`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_limits(Limits::default())
    }

    /// Create a parser using `limits.max_open_elements`.
    #[must_use]
    pub fn with_limits(limits: Limits) -> Self {
        Self {
            tokenizer: HTMLTokenizer::new(),
            builder: TreeBuilder::with_max_open_elements(limits.max_open_elements),
            failure: None,
        }
    }

    /// The tree built so far.
    #[must_use]
    pub const fn tree(&self) -> &DomTree {
        self.builder.tree()
    }

    /// The error that poisoned this parser, if any.
    #[must_use]
    pub const fn failure(&self) -> Option<&HtmlParseError> {
        self.failure.as_ref()
    }

    /// Consume one character.
    ///
    /// # Errors
    ///
    /// Returns the first fatal [`HtmlParseError`], from either the tokenizer
    /// or the tree builder.
    pub fn feed(&mut self, c: char) -> Result<(), HtmlParseError> {
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        let result = self.tokenizer.feed(c);
        let position = self.tokenizer.position();
        self.dispatch(result, position)
    }

    /// Consume every character of `input`.
    ///
    /// # Errors
    ///
    /// Same as [`feed`](Self::feed); characters after the failing one are not
    /// looked at.
    pub fn feed_str(&mut self, input: &str) -> Result<(), HtmlParseError> {
        input.chars().try_for_each(|c| self.feed(c))
    }

    /// Signal end of input and return the document.
    ///
    /// # Errors
    ///
    /// Returns the error that poisoned the parser, or the `eof-in-*` error for
    /// a tag, comment or DOCTYPE left open.
    pub fn finish(mut self) -> Result<DomTree, HtmlParseError> {
        if let Some(error) = self.failure {
            return Err(error);
        }
        let position = self.tokenizer.position();
        let result = std::mem::take(&mut self.tokenizer).finish();
        self.dispatch(result, position)?;
        Ok(self.builder.into_tree())
    }

    /// Hand a tokenizer result to the tree builder, recording any failure.
    /// Tree builder errors are reported at `(line, column)`.
    fn dispatch(
        &mut self,
        result: Result<Option<Token>, HtmlParseError>,
        (line, column): (usize, usize),
    ) -> Result<(), HtmlParseError> {
        let outcome = result.and_then(|token| {
            let Some(token) = token else {
                return Ok(());
            };
            self.builder
                .process_token(token)
                .map_err(|kind| HtmlParseError { kind, line, column })
        });
        if let Err(error) = &outcome {
            tracing::debug!(%error, "html parse failed");
            self.failure = Some(error.clone());
        }
        outcome
    }
}

impl Default for HTMLParser {
    fn default() -> Self {
        Self::new()
    }
}
