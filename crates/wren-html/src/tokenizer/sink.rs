use super::token::Token;
use crate::error::HtmlErrorKind;

/// Consumer of the tokens produced by [`HTMLTokenizer`](super::HTMLTokenizer).
///
/// The tree builder is the usual sink. A `Vec<Token>` collects the tokens
/// unchanged, which is what [`tokenize`](super::core::tokenize) uses.
pub trait TokenSink {
    /// Process one token.
    ///
    /// # Errors
    ///
    /// Returns an [`HtmlErrorKind`] when the token cannot be accepted. The
    /// caller attaches the input position.
    fn process_token(&mut self, token: Token) -> Result<(), HtmlErrorKind>;
}

impl TokenSink for Vec<Token> {
    fn process_token(&mut self, token: Token) -> Result<(), HtmlErrorKind> {
        self.push(token);
        Ok(())
    }
}
