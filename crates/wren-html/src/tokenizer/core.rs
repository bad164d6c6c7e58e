use strum_macros::Display;
use wren_dom::Attribute;

use super::sink::TokenSink;
use super::token::Token;
use crate::error::{HtmlErrorKind, HtmlParseError};

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// The tokenizer states. Each corresponds to a section in § 13.2.5; the
/// RCDATA, RAWTEXT, script and character reference families are not
/// implemented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TokenizerState {
    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    Data,
    /// [§ 13.2.5.6 Tag open state](https://html.spec.whatwg.org/multipage/parsing.html#tag-open-state)
    TagOpen,
    /// [§ 13.2.5.7 End tag open state](https://html.spec.whatwg.org/multipage/parsing.html#end-tag-open-state)
    EndTagOpen,
    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    TagName,
    /// [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
    BeforeAttributeName,
    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    AttributeName,
    /// [§ 13.2.5.34 After attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-name-state)
    AfterAttributeName,
    /// [§ 13.2.5.35 Before attribute value state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-value-state)
    BeforeAttributeValue,
    /// [§ 13.2.5.36 Attribute value (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(double-quoted)-state)
    AttributeValueDoubleQuoted,
    /// [§ 13.2.5.37 Attribute value (single-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(single-quoted)-state)
    AttributeValueSingleQuoted,
    /// [§ 13.2.5.38 Attribute value (unquoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(unquoted)-state)
    AttributeValueUnquoted,
    /// [§ 13.2.5.39 After attribute value (quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-value-(quoted)-state)
    AfterAttributeValueQuoted,
    /// [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
    SelfClosingStartTag,
    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    MarkupDeclarationOpen,
    /// [§ 13.2.5.43 Comment start state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-state)
    CommentStart,
    /// [§ 13.2.5.44 Comment start dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-dash-state)
    CommentStartDash,
    /// [§ 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    Comment,
    /// [§ 13.2.5.50 Comment end dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-dash-state)
    CommentEndDash,
    /// [§ 13.2.5.51 Comment end state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-state)
    CommentEnd,
    /// [§ 13.2.5.53 DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-state)
    Doctype,
    /// [§ 13.2.5.54 Before DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-name-state)
    BeforeDoctypeName,
    /// [§ 13.2.5.55 DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-name-state)
    DoctypeName,
    /// [§ 13.2.5.56 After DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-name-state)
    AfterDoctypeName,
}

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// "Implementations must act as if they used the following state machine to tokenize HTML."
///
/// The tokenizer is push-driven: the caller hands it one character at a
/// time through [`feed`](Self::feed) and receives at most one token back.
/// All state needed to resume lives in this struct, so input can stop at any
/// character boundary.
///
/// Every parse error is fatal. Once one is returned the tokenizer is
/// poisoned and keeps returning it.
#[derive(Debug, Clone)]
pub struct HTMLTokenizer {
    pub(super) state: TokenizerState,
    pub(super) current_token: Option<Token>,
    pub(super) current_attribute: Option<Attribute>,
    /// Characters seen so far in the markup declaration open state, matched
    /// against `--` and `DOCTYPE` as they arrive.
    pub(super) markup_buffer: String,
    // "Reconsume in the X state" sets this flag.
    pub(super) reconsume: bool,
    pub(super) emitted: Option<Token>,
    pub(super) line: usize,
    pub(super) column: usize,
    after_newline: bool,
    failure: Option<HtmlParseError>,
}

impl HTMLTokenizer {
    /// Create a tokenizer in the data state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: TokenizerState::Data,
            current_token: None,
            current_attribute: None,
            markup_buffer: String::new(),
            reconsume: false,
            emitted: None,
            line: 1,
            column: 0,
            after_newline: false,
            failure: None,
        }
    }

    /// The current state.
    #[must_use]
    pub const fn state(&self) -> TokenizerState {
        self.state
    }

    /// 1-based line and column of the last character fed.
    #[must_use]
    pub const fn position(&self) -> (usize, usize) {
        (self.line, self.column)
    }

    /// Consume one input character.
    ///
    /// # Errors
    ///
    /// Returns the fatal [`HtmlParseError`] raised by this character, or the
    /// error that previously poisoned the tokenizer.
    pub fn feed(&mut self, c: char) -> Result<Option<Token>, HtmlParseError> {
        self.check_failed()?;
        if self.after_newline {
            self.line += 1;
            self.column = 0;
        }
        self.column += 1;
        self.after_newline = c == '\n';
        self.run(Some(c))
    }

    /// Signal end of input. In the data state this yields
    /// [`Token::EndOfFile`].
    ///
    /// # Errors
    ///
    /// Returns the `eof-in-*` error for a construct left open, or the error
    /// that previously poisoned the tokenizer.
    pub fn finish(mut self) -> Result<Option<Token>, HtmlParseError> {
        self.check_failed()?;
        self.run(None)
    }

    fn check_failed(&self) -> Result<(), HtmlParseError> {
        self.failure.clone().map_or(Ok(()), Err)
    }

    /// Dispatch `input` until a transition consumes it.
    fn run(&mut self, input: Option<char>) -> Result<Option<Token>, HtmlParseError> {
        loop {
            self.reconsume = false;
            if let Err(kind) = self.step(input) {
                let error = self.error(kind);
                tracing::debug!(state = %self.state, %error, "tokenizer failed");
                self.failure = Some(error.clone());
                return Err(error);
            }
            if !self.reconsume {
                return Ok(self.emitted.take());
            }
        }
    }

    /// One transition of the state machine. `None` is end of input.
    fn step(&mut self, input: Option<char>) -> Result<(), HtmlErrorKind> {
        match self.state {
            TokenizerState::Data => self.handle_data_state(input),
            TokenizerState::TagOpen => self.handle_tag_open_state(input),
            TokenizerState::EndTagOpen => self.handle_end_tag_open_state(input),
            TokenizerState::TagName => self.handle_tag_name_state(input),
            TokenizerState::BeforeAttributeName => self.handle_before_attribute_name_state(input),
            TokenizerState::AttributeName => self.handle_attribute_name_state(input),
            TokenizerState::AfterAttributeName => self.handle_after_attribute_name_state(input),
            TokenizerState::BeforeAttributeValue => self.handle_before_attribute_value_state(input),
            TokenizerState::AttributeValueDoubleQuoted => {
                self.handle_attribute_value_quoted_state(input, '"')
            }
            TokenizerState::AttributeValueSingleQuoted => {
                self.handle_attribute_value_quoted_state(input, '\'')
            }
            TokenizerState::AttributeValueUnquoted => {
                self.handle_attribute_value_unquoted_state(input)
            }
            TokenizerState::AfterAttributeValueQuoted => {
                self.handle_after_attribute_value_quoted_state(input)
            }
            TokenizerState::SelfClosingStartTag => self.handle_self_closing_start_tag_state(input),
            TokenizerState::MarkupDeclarationOpen => {
                self.handle_markup_declaration_open_state(input)
            }
            TokenizerState::CommentStart => self.handle_comment_start_state(input),
            TokenizerState::CommentStartDash => self.handle_comment_start_dash_state(input),
            TokenizerState::Comment => self.handle_comment_state(input),
            TokenizerState::CommentEndDash => self.handle_comment_end_dash_state(input),
            TokenizerState::CommentEnd => self.handle_comment_end_state(input),
            TokenizerState::Doctype => self.handle_doctype_state(input),
            TokenizerState::BeforeDoctypeName => self.handle_before_doctype_name_state(input),
            TokenizerState::DoctypeName => self.handle_doctype_name_state(input),
            TokenizerState::AfterDoctypeName => self.handle_after_doctype_name_state(input),
        }
    }

    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    ///
    /// Character references are not decoded; `&` is ordinary text.
    #[allow(clippy::unnecessary_wraps)]
    fn handle_data_state(&mut self, input: Option<char>) -> Result<(), HtmlErrorKind> {
        match input {
            // "U+003C LESS-THAN SIGN (<) - Switch to the tag open state."
            Some('<') => self.switch_to(TokenizerState::TagOpen),
            // "EOF - Emit an end-of-file token."
            None => self.emit(Token::EndOfFile),
            // "Anything else - Emit the current input character as a character token."
            Some(c) => self.emit(Token::Character { data: c }),
        }
        Ok(())
    }

    /// [§ 13.2.5.6 Tag open state](https://html.spec.whatwg.org/multipage/parsing.html#tag-open-state)
    fn handle_tag_open_state(&mut self, input: Option<char>) -> Result<(), HtmlErrorKind> {
        match input {
            Some('!') => {
                self.markup_buffer.clear();
                self.switch_to(TokenizerState::MarkupDeclarationOpen);
            }
            Some('/') => self.switch_to(TokenizerState::EndTagOpen),
            // "ASCII alpha - Create a new start tag token, set its tag name to the empty
            // string. Reconsume in the tag name state."
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_token = Some(Token::new_start_tag());
                self.reconsume_in(TokenizerState::TagName);
            }
            None => return Err(HtmlErrorKind::EofBeforeTagName),
            Some(c) => return Err(HtmlErrorKind::InvalidCharacterInTagName(c)),
        }
        Ok(())
    }

    /// [§ 13.2.5.7 End tag open state](https://html.spec.whatwg.org/multipage/parsing.html#end-tag-open-state)
    fn handle_end_tag_open_state(&mut self, input: Option<char>) -> Result<(), HtmlErrorKind> {
        match input {
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_token = Some(Token::new_end_tag());
                self.reconsume_in(TokenizerState::TagName);
            }
            // "U+003E GREATER-THAN SIGN (>) - This is a missing-end-tag-name parse error.
            // Switch to the data state."
            Some('>') => {
                tracing::debug!("missing-end-tag-name: `</>` skipped");
                self.switch_to(TokenizerState::Data);
            }
            None => return Err(HtmlErrorKind::EofBeforeTagName),
            Some(c) => return Err(HtmlErrorKind::InvalidCharacterInTagName(c)),
        }
        Ok(())
    }

    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    fn handle_tag_name_state(&mut self, input: Option<char>) -> Result<(), HtmlErrorKind> {
        match input {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            None => return Err(HtmlErrorKind::EofInTag),
            // Tag names are stored lowercase.
            Some(c) => {
                if let Some(token) = self.current_token.as_mut() {
                    token.append_to_tag_name(c.to_ascii_lowercase());
                }
            }
        }
        Ok(())
    }

    /// [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
    fn handle_before_attribute_name_state(
        &mut self,
        input: Option<char>,
    ) -> Result<(), HtmlErrorKind> {
        match input {
            // "Ignore the character."
            Some(c) if Self::is_whitespace_char(c) => {}
            // "U+002F SOLIDUS (/), U+003E GREATER-THAN SIGN (>), EOF - Reconsume in the
            // after attribute name state."
            Some('/' | '>') | None => self.reconsume_in(TokenizerState::AfterAttributeName),
            Some('=') => return Err(HtmlErrorKind::UnexpectedEqualsBeforeAttributeName),
            Some(_) => {
                self.start_new_attribute();
                self.reconsume_in(TokenizerState::AttributeName);
            }
        }
        Ok(())
    }

    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    fn handle_attribute_name_state(&mut self, input: Option<char>) -> Result<(), HtmlErrorKind> {
        match input {
            Some(c) if Self::is_whitespace_char(c) => {
                self.reconsume_in(TokenizerState::AfterAttributeName);
            }
            Some('/' | '>') | None => self.reconsume_in(TokenizerState::AfterAttributeName),
            Some('=') => self.switch_to(TokenizerState::BeforeAttributeValue),
            Some(c @ ('"' | '\'' | '<')) => {
                return Err(HtmlErrorKind::UnexpectedCharacterInAttributeName(c));
            }
            Some(c) => self.append_to_attribute_name(c),
        }
        Ok(())
    }

    /// [§ 13.2.5.34 After attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-name-state)
    fn handle_after_attribute_name_state(
        &mut self,
        input: Option<char>,
    ) -> Result<(), HtmlErrorKind> {
        match input {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('=') => self.switch_to(TokenizerState::BeforeAttributeValue),
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            None => return Err(HtmlErrorKind::EofInTag),
            // "Start a new attribute in the current tag token. Set that attribute name
            // and value to the empty string. Reconsume in the attribute name state."
            Some(_) => {
                self.start_new_attribute();
                self.reconsume_in(TokenizerState::AttributeName);
            }
        }
        Ok(())
    }

    /// [§ 13.2.5.35 Before attribute value state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-value-state)
    fn handle_before_attribute_value_state(
        &mut self,
        input: Option<char>,
    ) -> Result<(), HtmlErrorKind> {
        match input {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('"') => self.switch_to(TokenizerState::AttributeValueDoubleQuoted),
            Some('\'') => self.switch_to(TokenizerState::AttributeValueSingleQuoted),
            Some('>') => return Err(HtmlErrorKind::MissingAttributeValue),
            _ => self.reconsume_in(TokenizerState::AttributeValueUnquoted),
        }
        Ok(())
    }

    /// [§ 13.2.5.36](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(double-quoted)-state)
    /// and [§ 13.2.5.37](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(single-quoted)-state),
    /// which differ only in the closing quote.
    fn handle_attribute_value_quoted_state(
        &mut self,
        input: Option<char>,
        quote: char,
    ) -> Result<(), HtmlErrorKind> {
        match input {
            Some(c) if c == quote => self.switch_to(TokenizerState::AfterAttributeValueQuoted),
            None => return Err(HtmlErrorKind::EofInTag),
            Some(c) => self.append_to_attribute_value(c),
        }
        Ok(())
    }

    /// [§ 13.2.5.38 Attribute value (unquoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(unquoted)-state)
    fn handle_attribute_value_unquoted_state(
        &mut self,
        input: Option<char>,
    ) -> Result<(), HtmlErrorKind> {
        match input {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            Some(c @ ('"' | '\'' | '<' | '=' | '`')) => {
                return Err(HtmlErrorKind::UnexpectedCharacterInUnquotedAttributeValue(c));
            }
            None => return Err(HtmlErrorKind::EofInTag),
            Some(c) => self.append_to_attribute_value(c),
        }
        Ok(())
    }

    /// [§ 13.2.5.39 After attribute value (quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-value-(quoted)-state)
    fn handle_after_attribute_value_quoted_state(
        &mut self,
        input: Option<char>,
    ) -> Result<(), HtmlErrorKind> {
        match input {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            None => return Err(HtmlErrorKind::EofInTag),
            Some(_) => return Err(HtmlErrorKind::MissingWhitespaceBetweenAttributes),
        }
        Ok(())
    }

    /// [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
    fn handle_self_closing_start_tag_state(
        &mut self,
        input: Option<char>,
    ) -> Result<(), HtmlErrorKind> {
        match input {
            // "Set the self-closing flag of the current tag token. Switch to the data
            // state. Emit the current token."
            Some('>') => {
                if let Some(token) = self.current_token.as_mut() {
                    token.set_self_closing();
                }
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            None => return Err(HtmlErrorKind::EofInTag),
            // "This is an unexpected-solidus-in-tag parse error. Reconsume in the
            // before attribute name state." Recoverable, so not fatal here.
            Some(_) => {
                tracing::debug!("unexpected-solidus-in-tag");
                self.reconsume_in(TokenizerState::BeforeAttributeName);
            }
        }
        Ok(())
    }

    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    ///
    /// The standard looks ahead at "the next few characters". Input arrives one
    /// character at a time here, so they are buffered until they either spell
    /// `--` or `DOCTYPE` or stop being a prefix of either.
    fn handle_markup_declaration_open_state(
        &mut self,
        input: Option<char>,
    ) -> Result<(), HtmlErrorKind> {
        const DOCTYPE: &str = "DOCTYPE";

        let Some(c) = input else {
            return Err(HtmlErrorKind::IncorrectlyOpenedComment);
        };
        self.markup_buffer.push(c);
        let seen = self.markup_buffer.as_str();

        if seen == "--" {
            self.current_token = Some(Token::new_comment());
            self.switch_to(TokenizerState::CommentStart);
        } else if seen.eq_ignore_ascii_case(DOCTYPE) {
            self.switch_to(TokenizerState::Doctype);
        } else if !("--".starts_with(seen)
            || DOCTYPE
                .get(..seen.len())
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case(seen)))
        {
            return Err(HtmlErrorKind::IncorrectlyOpenedComment);
        }
        Ok(())
    }

    /// [§ 13.2.5.43 Comment start state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-state)
    fn handle_comment_start_state(&mut self, input: Option<char>) -> Result<(), HtmlErrorKind> {
        match input {
            Some('-') => self.switch_to(TokenizerState::CommentStartDash),
            // "This is an abrupt-closing-of-empty-comment parse error. Switch to the
            // data state. Emit the current comment token."
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            None => return Err(HtmlErrorKind::EofInComment),
            Some(_) => self.reconsume_in(TokenizerState::Comment),
        }
        Ok(())
    }

    /// [§ 13.2.5.44 Comment start dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-dash-state)
    fn handle_comment_start_dash_state(
        &mut self,
        input: Option<char>,
    ) -> Result<(), HtmlErrorKind> {
        match input {
            Some('-') => self.switch_to(TokenizerState::CommentEnd),
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            None => return Err(HtmlErrorKind::EofInComment),
            Some(_) => {
                self.append_to_comment("-");
                self.reconsume_in(TokenizerState::Comment);
            }
        }
        Ok(())
    }

    /// [§ 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    ///
    /// Nested `<!--` is not special-cased.
    fn handle_comment_state(&mut self, input: Option<char>) -> Result<(), HtmlErrorKind> {
        match input {
            Some('-') => self.switch_to(TokenizerState::CommentEndDash),
            None => return Err(HtmlErrorKind::EofInComment),
            Some(c) => self.append_to_comment(c.encode_utf8(&mut [0; 4])),
        }
        Ok(())
    }

    /// [§ 13.2.5.50 Comment end dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-dash-state)
    fn handle_comment_end_dash_state(&mut self, input: Option<char>) -> Result<(), HtmlErrorKind> {
        match input {
            Some('-') => self.switch_to(TokenizerState::CommentEnd),
            None => return Err(HtmlErrorKind::EofInComment),
            Some(_) => {
                self.append_to_comment("-");
                self.reconsume_in(TokenizerState::Comment);
            }
        }
        Ok(())
    }

    /// [§ 13.2.5.51 Comment end state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-state)
    fn handle_comment_end_state(&mut self, input: Option<char>) -> Result<(), HtmlErrorKind> {
        match input {
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            Some('-') => self.append_to_comment("-"),
            None => return Err(HtmlErrorKind::EofInComment),
            Some(_) => {
                self.append_to_comment("--");
                self.reconsume_in(TokenizerState::Comment);
            }
        }
        Ok(())
    }

    /// [§ 13.2.5.53 DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-state)
    fn handle_doctype_state(&mut self, input: Option<char>) -> Result<(), HtmlErrorKind> {
        match input {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeDoctypeName);
            }
            None => return Err(HtmlErrorKind::EofInDoctype),
            // ">" and "missing-whitespace-before-doctype-name" both reconsume.
            Some(_) => self.reconsume_in(TokenizerState::BeforeDoctypeName),
        }
        Ok(())
    }

    /// [§ 13.2.5.54 Before DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-name-state)
    fn handle_before_doctype_name_state(
        &mut self,
        input: Option<char>,
    ) -> Result<(), HtmlErrorKind> {
        match input {
            Some(c) if Self::is_whitespace_char(c) => {}
            // "This is a missing-doctype-name parse error. Create a new DOCTYPE token.
            // Set its force-quirks flag to on. Switch to the data state. Emit the
            // current token."
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit(Token::new_doctype());
            }
            None => return Err(HtmlErrorKind::EofInDoctype),
            Some(c) => {
                let mut token = Token::new_doctype();
                token.append_to_doctype_name(c.to_ascii_lowercase());
                self.current_token = Some(token);
                self.switch_to(TokenizerState::DoctypeName);
            }
        }
        Ok(())
    }

    /// [§ 13.2.5.55 DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-name-state)
    fn handle_doctype_name_state(&mut self, input: Option<char>) -> Result<(), HtmlErrorKind> {
        match input {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::AfterDoctypeName);
            }
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            None => return Err(HtmlErrorKind::EofInDoctype),
            Some(c) => {
                if let Some(token) = self.current_token.as_mut() {
                    token.append_to_doctype_name(c.to_ascii_lowercase());
                }
            }
        }
        Ok(())
    }

    /// [§ 13.2.5.56 After DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-name-state)
    ///
    /// `PUBLIC` and `SYSTEM` identifiers are skipped up to the closing `>`.
    fn handle_after_doctype_name_state(
        &mut self,
        input: Option<char>,
    ) -> Result<(), HtmlErrorKind> {
        match input {
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            None => return Err(HtmlErrorKind::EofInDoctype),
            Some(_) => {}
        }
        Ok(())
    }

    fn append_to_comment(&mut self, s: &str) {
        if let Some(token) = self.current_token.as_mut() {
            token.append_to_comment(s);
        }
    }
}

impl Default for HTMLTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Tokenize a complete string, stopping at the first error.
///
/// The returned tokens end with [`Token::EndOfFile`].
///
/// # Errors
///
/// Returns the first fatal [`HtmlParseError`].
pub fn tokenize(input: &str) -> Result<Vec<Token>, HtmlParseError> {
    let mut tokens = Vec::new();
    tokenize_into(input, &mut tokens)?;
    Ok(tokens)
}

/// Tokenize a complete string, handing every token to `sink`.
///
/// # Errors
///
/// Returns the first fatal [`HtmlParseError`] from the tokenizer or the
/// sink. Sink errors carry the position of the character that completed the
/// token.
pub fn tokenize_into<S: TokenSink>(input: &str, sink: &mut S) -> Result<(), HtmlParseError> {
    let mut tokenizer = HTMLTokenizer::new();
    for c in input.chars() {
        if let Some(token) = tokenizer.feed(c)? {
            let (line, column) = tokenizer.position();
            sink.process_token(token)
                .map_err(|kind| HtmlParseError { kind, line, column })?;
        }
    }
    let (line, column) = tokenizer.position();
    if let Some(token) = tokenizer.finish()? {
        sink.process_token(token)
            .map_err(|kind| HtmlParseError { kind, line, column })?;
    }
    Ok(())
}
