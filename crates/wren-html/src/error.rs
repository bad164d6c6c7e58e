//! Fatal parse errors.
//!
//! Unlike a browser, which recovers from every malformed document, this
//! parser stops at the first error and returns no tree. Kind names follow the
//! parse error codes of
//! [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
//! where one exists.

use thiserror::Error;

/// What went wrong.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HtmlErrorKind {
    /// Input ended right after `<` or `</`.
    #[error("eof-before-tag-name")]
    EofBeforeTagName,
    /// `<` or `</` followed by something that cannot start a tag name.
    #[error("invalid-first-character-of-tag-name {0:?}")]
    InvalidCharacterInTagName(char),
    /// `=` where an attribute name should start.
    #[error("unexpected-equals-sign-before-attribute-name")]
    UnexpectedEqualsBeforeAttributeName,
    /// `"`, `'` or `<` inside an attribute name.
    #[error("unexpected-character-in-attribute-name {0:?}")]
    UnexpectedCharacterInAttributeName(char),
    /// Input ended inside a tag.
    #[error("eof-in-tag")]
    EofInTag,
    /// `>` right after `=`.
    #[error("missing-attribute-value")]
    MissingAttributeValue,
    /// `"`, `'`, `<`, `=` or a backtick inside an unquoted attribute value.
    #[error("unexpected-character-in-unquoted-attribute-value {0:?}")]
    UnexpectedCharacterInUnquotedAttributeValue(char),
    /// A quoted attribute value followed directly by another attribute.
    #[error("missing-whitespace-between-attributes")]
    MissingWhitespaceBetweenAttributes,
    /// An end tag that does not close the current element.
    #[error("tag mismatch: expected </{expected}>, found </{found}>")]
    TagMismatch {
        /// Tag name of the current open element, or `#document` when no
        /// element is open.
        expected: String,
        /// Tag name of the end tag.
        found: String,
    },
    /// Input ended inside a `<!DOCTYPE>` declaration.
    #[error("eof-in-doctype")]
    EofInDoctype,
    /// `<!` not followed by `--` or `DOCTYPE`.
    #[error("incorrectly-opened-comment")]
    IncorrectlyOpenedComment,
    /// Input ended inside a comment.
    #[error("eof-in-comment")]
    EofInComment,
    /// The open-element stack grew past the configured limit.
    #[error("elements nested deeper than {limit}")]
    NestingTooDeep {
        /// Configured maximum depth.
        limit: usize,
    },
}

/// A fatal error and where in the input it was detected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at line {line}, column {column}")]
pub struct HtmlParseError {
    /// What went wrong.
    pub kind: HtmlErrorKind,
    /// 1-based line of the offending character (or of end of input).
    pub line: usize,
    /// 1-based column of the offending character; 0 before the first
    /// character of a line.
    pub column: usize,
}
