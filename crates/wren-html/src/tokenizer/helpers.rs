//! Helper functions for the HTML tokenizer.
//!
//! [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//!
//! - State transitions ("Switch to", "Reconsume in")
//! - Token emission ("Emit the current token")
//! - Attribute bookkeeping, including duplicate removal
//! - Fatal error construction with the current input position

use wren_dom::Attribute;

use super::core::{HTMLTokenizer, TokenizerState};
use super::token::Token;
use crate::error::{HtmlErrorKind, HtmlParseError};

// =============================================================================
// State Transition Helpers
// =============================================================================

impl HTMLTokenizer {
    /// "Switch to the X state"
    ///
    /// The next character will be consumed in `new_state`.
    pub(super) fn switch_to(&mut self, new_state: TokenizerState) {
        if self.state != new_state {
            tracing::trace!(from = %self.state, to = %new_state, "tokenizer transition");
        }
        self.state = new_state;
    }

    /// "Reconsume in the X state"
    ///
    /// The current character is dispatched again, in `new_state`, before
    /// `feed` returns.
    pub(super) fn reconsume_in(&mut self, new_state: TokenizerState) {
        self.reconsume = true;
        self.switch_to(new_state);
    }
}

// =============================================================================
// Token Emission Helpers
// =============================================================================

impl HTMLTokenizer {
    /// "Emit the current token"
    ///
    /// A pending attribute is committed first so it is part of the token.
    pub(super) fn emit_current_token(&mut self) {
        self.commit_attribute();
        if let Some(token) = self.current_token.take() {
            self.emit(token);
        }
    }

    /// Queue `token` as the result of the current `feed` call.
    pub(super) fn emit(&mut self, token: Token) {
        debug_assert!(self.emitted.is_none(), "at most one token per character");
        self.emitted = Some(token);
    }
}

// =============================================================================
// Attribute Helpers
// =============================================================================

impl HTMLTokenizer {
    /// "Start a new attribute in the current tag token. Set that attribute
    /// name and value to the empty string."
    pub(super) fn start_new_attribute(&mut self) {
        self.commit_attribute();
        self.current_attribute = Some(Attribute::new(String::new(), String::new()));
    }

    pub(super) fn append_to_attribute_name(&mut self, c: char) {
        if let Some(attribute) = self.current_attribute.as_mut() {
            attribute.name.push(c.to_ascii_lowercase());
        }
    }

    pub(super) fn append_to_attribute_value(&mut self, c: char) {
        if let Some(attribute) = self.current_attribute.as_mut() {
            attribute.value.push(c);
        }
    }

    /// Move the attribute under construction onto the current tag token,
    /// dropping it if the tag already has an attribute with that name.
    fn commit_attribute(&mut self) {
        let Some(attribute) = self.current_attribute.take() else {
            return;
        };
        if let Some(token) = self.current_token.as_mut() {
            let name = attribute.name.clone();
            if !token.push_attribute(attribute) {
                tracing::debug!(attribute = %name, "duplicate attribute dropped");
            }
        }
    }
}

// =============================================================================
// Character Classes and Errors
// =============================================================================

impl HTMLTokenizer {
    /// [ASCII whitespace](https://infra.spec.whatwg.org/#ascii-whitespace)
    /// as used by the tokenizer: TAB, LF, FF, SPACE. CR is treated the same
    /// since input is not newline-normalized.
    pub(super) const fn is_whitespace_char(c: char) -> bool {
        matches!(c, ' ' | '\t' | '\n' | '\x0C' | '\r')
    }

    /// A fatal error at the current input position.
    pub(crate) fn error(&self, kind: HtmlErrorKind) -> HtmlParseError {
        HtmlParseError {
            kind,
            line: self.line,
            column: self.column,
        }
    }
}
