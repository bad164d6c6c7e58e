//! Incremental HTML tokenizer and tree builder for the Wren pipeline.
//!
//! # Scope
//!
//! This crate implements:
//! - **HTML Tokenizer** ([WHATWG § 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization))
//!   - Data, tag, attribute, comment and DOCTYPE states
//!   - One character in, at most one token out
//!
//! - **Tree Builder** ([WHATWG § 13.2.6](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction))
//!   - A single stack of open elements; end tags must match the current node
//!
//! # Not Yet Implemented
//!
//! - Character references
//! - RCDATA, RAWTEXT and script data states
//! - Insertion modes and implied tags
//! - Error recovery: every parse error is fatal

/// Fatal parse errors.
pub mod error;
/// HTML parser and tree construction.
pub mod parser;
/// HTML tokenizer for converting input into tokens.
pub mod tokenizer;

pub use error::{HtmlErrorKind, HtmlParseError};
pub use parser::{HTMLParser, TreeBuilder};
pub use tokenizer::core::{tokenize, tokenize_into};
pub use tokenizer::{HTMLTokenizer, Token, TokenSink, TokenizerState};

use wren_common::Limits;
use wren_dom::DomTree;

/// Parse a complete document with default limits.
///
/// # Errors
///
/// Returns the first fatal [`HtmlParseError`].
pub fn parse_document(html: &str) -> Result<DomTree, HtmlParseError> {
    parse_document_with_limits(html, Limits::default())
}

/// Parse a complete document.
///
/// # Errors
///
/// Returns the first fatal [`HtmlParseError`].
pub fn parse_document_with_limits(
    html: &str,
    limits: Limits,
) -> Result<DomTree, HtmlParseError> {
    let mut parser = HTMLParser::with_limits(limits);
    parser.feed_str(html)?;
    parser.finish()
}
