//! HTML tokenizer module.
//!
//! Implements the subset of
//! [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//! needed for tags, attributes, text, comments and DOCTYPE declarations.

/// Tokenizer state machine.
pub mod core;
/// Helper methods for tokenizer state transitions.
mod helpers;
/// The consumer side of the tokenizer.
pub mod sink;
/// Token types produced by the tokenizer.
pub mod token;

pub use core::{HTMLTokenizer, TokenizerState};
pub use sink::TokenSink;
pub use token::Token;
