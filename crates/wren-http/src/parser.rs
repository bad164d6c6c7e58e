//! [RFC 9112 § 2.1 Message Format](https://www.rfc-editor.org/rfc/rfc9112#section-2.1)
//!
//! ```text
//! HTTP-message   = start-line CRLF
//!                  *( field-line CRLF )
//!                  CRLF
//!                  [ message-body ]
//! ```
//!
//! [`ResponseParser`] walks this grammar one character at a time. Input may
//! arrive split at any point (including inside a multi-byte UTF-8 sequence,
//! via [`ResponseParser::receive_bytes`]) and parsing resumes exactly where
//! the previous read stopped.

use std::collections::HashMap;
use std::mem;

use strum_macros::Display;
use wren_common::Limits;

use crate::chunked::ChunkedBodyDecoder;
use crate::error::{ChunkFramingError, HttpError};
use crate::response::{HttpResponse, StatusLine, lists_token, status_disallows_body};

/// Position in the message grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ParserState {
    /// Reading the status line.
    StatusLine,
    /// Saw CR after the status line, expecting LF.
    StatusLineEnd,
    /// At the start of a header line (or of the blank terminator line).
    FieldLineStart,
    /// Reading a field name up to the colon.
    FieldName,
    /// Reading a field value up to the CR.
    FieldValue,
    /// Saw CR after a field value, expecting LF.
    FieldLineEnd,
    /// Saw the CR of the blank line closing the header block, expecting LF.
    HeaderBlockEnd,
    /// Reading the message body.
    Body,
    /// The response is complete.
    Done,
}

/// How the message body is delimited.
///
/// [RFC 9112 § 6.3 Message Body Length](https://www.rfc-editor.org/rfc/rfc9112#section-6.3)
#[derive(Debug, Clone)]
enum BodyReader {
    /// `Transfer-Encoding: chunked`.
    Chunked(ChunkedBodyDecoder),
    /// `Content-Length: n`, counted in UTF-8 bytes.
    Fixed {
        expected: usize,
        received: usize,
        data: String,
    },
    /// Neither header: the body runs until the connection closes.
    UntilClose(String),
}

/// Incremental, single-use HTTP/1.1 response parser.
///
/// # Example
///
/// ```
/// use wren_http::ResponseParser;
///
/// let mut parser = ResponseParser::new();
/// parser.receive("HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n").unwrap();
/// assert!(!parser.is_finished());
/// parser.receive("2\r\nhi\r\n0\r\n\r\n").unwrap();
/// assert_eq!(parser.response().unwrap().body.as_deref(), Some("hi"));
/// ```
#[derive(Debug, Clone)]
pub struct ResponseParser {
    state: ParserState,
    limits: Limits,
    line: String,
    field_name: String,
    field_value: String,
    status: Option<StatusLine>,
    headers: HashMap<String, String>,
    header_count: usize,
    chunked: bool,
    content_length: Option<String>,
    body: Option<BodyReader>,
    response: Option<HttpResponse>,
    pending_bytes: Vec<u8>,
    failure: Option<HttpError>,
}

impl ResponseParser {
    /// Create a parser with default [`Limits`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_limits(Limits::default())
    }

    /// Create a parser enforcing `limits`.
    #[must_use]
    pub fn with_limits(limits: Limits) -> Self {
        Self {
            state: ParserState::StatusLine,
            limits,
            line: String::new(),
            field_name: String::new(),
            field_value: String::new(),
            status: None,
            headers: HashMap::new(),
            header_count: 0,
            chunked: false,
            content_length: None,
            body: None,
            response: None,
            pending_bytes: Vec::new(),
            failure: None,
        }
    }

    /// Current position in the message grammar.
    #[must_use]
    pub const fn state(&self) -> ParserState {
        self.state
    }

    /// Whether a complete response has been parsed.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.response.is_some()
    }

    /// The parsed response.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::NotReady`] until the message is complete, or the
    /// error that stopped parsing.
    pub fn response(&self) -> Result<&HttpResponse, HttpError> {
        if let Some(failure) = &self.failure {
            return Err(failure.clone());
        }
        self.response.as_ref().ok_or(HttpError::NotReady)
    }

    /// Consume the parser and take ownership of the parsed response.
    ///
    /// # Errors
    ///
    /// Same as [`Self::response`].
    pub fn into_response(self) -> Result<HttpResponse, HttpError> {
        if let Some(failure) = self.failure {
            return Err(failure);
        }
        self.response.ok_or(HttpError::NotReady)
    }

    /// Feed raw bytes as read from the network.
    ///
    /// A UTF-8 sequence split across two reads is held back until the rest of
    /// it arrives.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::InvalidEncoding`] for bytes that can never form
    /// valid UTF-8, or any error from [`Self::receive`].
    pub fn receive_bytes(&mut self, bytes: &[u8]) -> Result<(), HttpError> {
        self.check_failed()?;
        let mut pending = mem::take(&mut self.pending_bytes);
        pending.extend_from_slice(bytes);

        let valid_up_to = match std::str::from_utf8(&pending) {
            Ok(_) => pending.len(),
            Err(error) if error.error_len().is_none() => error.valid_up_to(),
            Err(error) => {
                return Err(self.fail(HttpError::InvalidEncoding {
                    offset: error.valid_up_to(),
                }));
            }
        };

        let (complete, incomplete) = pending.split_at(valid_up_to);
        let text = std::str::from_utf8(complete)
            .map_err(|error| HttpError::InvalidEncoding {
                offset: error.valid_up_to(),
            })?;
        self.receive(text)?;
        self.pending_bytes = incomplete.to_vec();
        Ok(())
    }

    /// Feed decoded characters.
    ///
    /// # Errors
    ///
    /// Returns the first grammar or limit violation. The parser is then
    /// poisoned and every later call returns the same error.
    pub fn receive(&mut self, text: &str) -> Result<(), HttpError> {
        self.check_failed()?;
        for c in text.chars() {
            if let Err(error) = self.step(c) {
                return Err(self.fail(error));
            }
        }
        Ok(())
    }

    /// Signal end of input.
    ///
    /// Completes a body delimited by connection close.
    ///
    /// # Errors
    ///
    /// - [`HttpError::UnterminatedHeaderBlock`] if input ended before the
    ///   blank line closing the headers.
    /// - [`HttpError::ChunkFraming`] if a chunked body is incomplete.
    /// - [`HttpError::BodyLengthMismatch`] if a `Content-Length` body is short.
    /// - [`HttpError::InvalidEncoding`] if a UTF-8 sequence was left dangling.
    pub fn finish(&mut self) -> Result<(), HttpError> {
        self.check_failed()?;
        let result = self.finish_inner();
        result.map_err(|error| self.fail(error))
    }

    fn finish_inner(&mut self) -> Result<(), HttpError> {
        if !self.pending_bytes.is_empty() {
            return Err(HttpError::InvalidEncoding { offset: 0 });
        }
        match self.state {
            ParserState::Done => Ok(()),
            ParserState::Body => match self.body.take() {
                Some(BodyReader::UntilClose(data)) => {
                    self.complete(Some(data));
                    Ok(())
                }
                Some(BodyReader::Fixed {
                    expected, received, ..
                }) => Err(HttpError::BodyLengthMismatch { expected, received }),
                Some(BodyReader::Chunked(_)) | None => Err(ChunkFramingError::Truncated.into()),
            },
            _ => Err(HttpError::UnterminatedHeaderBlock),
        }
    }

    fn check_failed(&self) -> Result<(), HttpError> {
        self.failure.clone().map_or(Ok(()), Err)
    }

    fn fail(&mut self, error: HttpError) -> HttpError {
        tracing::debug!(state = %self.state, %error, "response parse failed");
        self.failure = Some(error.clone());
        error
    }

    fn step(&mut self, c: char) -> Result<(), HttpError> {
        let next = match self.state {
            ParserState::StatusLine => match c {
                '\r' => ParserState::StatusLineEnd,
                '\n' => return Err(self.invalid_status_line()),
                _ => {
                    self.push_line_char(c)?;
                    ParserState::StatusLine
                }
            },
            ParserState::StatusLineEnd => {
                if c != '\n' {
                    return Err(self.invalid_status_line());
                }
                let status = StatusLine::parse(&mem::take(&mut self.line))?;
                tracing::debug!(version = %status.version, code = %status.status_code, "status line parsed");
                self.status = Some(status);
                ParserState::FieldLineStart
            }
            ParserState::FieldLineStart => match c {
                '\r' => ParserState::HeaderBlockEnd,
                '\n' | ':' => return Err(self.invalid_header_line(c)),
                _ => {
                    self.push_line_char(c)?;
                    self.field_name.push(c);
                    ParserState::FieldName
                }
            },
            ParserState::FieldName => match c {
                ':' => {
                    self.push_line_char(c)?;
                    ParserState::FieldValue
                }
                '\r' | '\n' => return Err(self.invalid_header_line(c)),
                _ => {
                    self.push_line_char(c)?;
                    self.field_name.push(c);
                    ParserState::FieldName
                }
            },
            ParserState::FieldValue => match c {
                '\r' => ParserState::FieldLineEnd,
                '\n' => return Err(self.invalid_header_line(c)),
                // Leading OWS
                ' ' | '\t' if self.field_value.is_empty() => {
                    self.push_line_char(c)?;
                    ParserState::FieldValue
                }
                _ => {
                    self.push_line_char(c)?;
                    self.field_value.push(c);
                    ParserState::FieldValue
                }
            },
            ParserState::FieldLineEnd => {
                if c != '\n' {
                    return Err(self.invalid_header_line(c));
                }
                self.commit_field()?;
                ParserState::FieldLineStart
            }
            ParserState::HeaderBlockEnd => {
                if c != '\n' {
                    return Err(self.invalid_header_line(c));
                }
                self.dispatch_body()?
            }
            ParserState::Body => self.step_body(c)?,
            ParserState::Done => return Err(HttpError::UnexpectedDataAfterMessage),
        };
        if next != self.state {
            tracing::trace!(from = %self.state, to = %next, "response parser transition");
        }
        self.state = next;
        Ok(())
    }

    fn push_line_char(&mut self, c: char) -> Result<(), HttpError> {
        if self.line.len() + c.len_utf8() > self.limits.max_header_line_bytes {
            return Err(HttpError::HeaderTooLarge {
                limit: self.limits.max_header_line_bytes,
                unit: "bytes in one line",
            });
        }
        self.line.push(c);
        Ok(())
    }

    fn invalid_status_line(&mut self) -> HttpError {
        HttpError::InvalidStatusLine {
            line: mem::take(&mut self.line),
        }
    }

    fn invalid_header_line(&mut self, c: char) -> HttpError {
        let mut line = mem::take(&mut self.line);
        line.push(c);
        HttpError::InvalidHeaderLine { line }
    }

    /// [RFC 9112 § 5](https://www.rfc-editor.org/rfc/rfc9112#section-5)
    ///
    /// `field-line = field-name ":" OWS field-value OWS`
    fn commit_field(&mut self) -> Result<(), HttpError> {
        self.line.clear();
        let name = mem::take(&mut self.field_name);
        let value = mem::take(&mut self.field_value);
        if name.trim().is_empty() || name.contains([' ', '\t']) {
            return Err(HttpError::InvalidHeaderLine {
                line: format!("{name}:{value}"),
            });
        }
        self.header_count += 1;
        if self.header_count > self.limits.max_header_count {
            return Err(HttpError::HeaderTooLarge {
                limit: self.limits.max_header_count,
                unit: "fields",
            });
        }
        let value = value.trim_end_matches([' ', '\t']).to_string();
        tracing::trace!(name = %name, value = %value, "header field");
        if name.eq_ignore_ascii_case("transfer-encoding") {
            self.chunked |= lists_token(&value, "chunked");
        } else if name.eq_ignore_ascii_case("content-length") {
            self.record_content_length(&value)?;
        }
        let _ = self.headers.insert(name, value);
        Ok(())
    }

    /// [RFC 9112 § 6.3](https://www.rfc-editor.org/rfc/rfc9112#section-6.3)
    ///
    /// Repeated `Content-Length` fields, in any letter case, must agree.
    fn record_content_length(&mut self, value: &str) -> Result<(), HttpError> {
        if let Some(previous) = &self.content_length
            && previous.trim() != value.trim()
        {
            return Err(HttpError::InvalidContentLength {
                value: format!("{previous}, {value}"),
            });
        }
        self.content_length = Some(value.to_string());
        Ok(())
    }

    /// Pick the body framing once the header block is closed.
    fn dispatch_body(&mut self) -> Result<ParserState, HttpError> {
        let code = self.status.as_ref().map_or(0, StatusLine::code);

        if status_disallows_body(code) {
            tracing::debug!(code, "status forbids a body");
            self.complete(None);
            return Ok(ParserState::Done);
        }

        if self.chunked {
            tracing::debug!("reading chunked body");
            self.body = Some(BodyReader::Chunked(ChunkedBodyDecoder::with_max_chunk_size(
                self.limits.max_chunk_size,
            )));
            return Ok(ParserState::Body);
        }

        if let Some(raw) = self.content_length.take() {
            let expected = raw
                .trim()
                .parse::<usize>()
                .map_err(|_| HttpError::InvalidContentLength {
                    value: raw.clone(),
                })?;
            tracing::debug!(expected, "reading fixed-length body");
            if expected == 0 {
                self.complete(Some(String::new()));
                return Ok(ParserState::Done);
            }
            self.body = Some(BodyReader::Fixed {
                expected,
                received: 0,
                data: String::new(),
            });
            return Ok(ParserState::Body);
        }

        tracing::debug!("reading body until connection close");
        self.body = Some(BodyReader::UntilClose(String::new()));
        Ok(ParserState::Body)
    }

    fn step_body(&mut self, c: char) -> Result<ParserState, HttpError> {
        let finished = match &mut self.body {
            Some(BodyReader::Chunked(decoder)) => {
                decoder.receive_char(c)?;
                decoder.body()
            }
            Some(BodyReader::Fixed {
                expected,
                received,
                data,
            }) => {
                *received += c.len_utf8();
                if *received > *expected {
                    return Err(HttpError::BodyLengthMismatch {
                        expected: *expected,
                        received: *received,
                    });
                }
                data.push(c);
                (*received == *expected).then(|| mem::take(data))
            }
            Some(BodyReader::UntilClose(data)) => {
                data.push(c);
                None
            }
            None => return Err(HttpError::UnexpectedDataAfterMessage),
        };

        Ok(match finished {
            Some(body) => {
                self.body = None;
                self.complete(Some(body));
                ParserState::Done
            }
            None => ParserState::Body,
        })
    }

    fn complete(&mut self, body: Option<String>) {
        let Some(status) = self.status.take() else {
            return;
        };
        tracing::debug!(
            code = %status.status_code,
            headers = self.headers.len(),
            body_len = body.as_ref().map_or(0, String::len),
            "response complete"
        );
        self.response = Some(HttpResponse {
            version: status.version,
            status_code: status.status_code,
            reason: status.reason,
            headers: mem::take(&mut self.headers),
            body,
        });
    }
}

impl Default for ResponseParser {
    fn default() -> Self {
        Self::new()
    }
}
