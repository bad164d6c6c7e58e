//! [RFC 9112 § 7.1 Chunked Transfer Coding](https://www.rfc-editor.org/rfc/rfc9112#section-7.1)
//!
//! ```text
//! chunked-body   = *chunk
//!                  last-chunk
//!                  trailer-section
//!                  CRLF
//!
//! chunk          = chunk-size [ chunk-ext ] CRLF
//!                  chunk-data CRLF
//! chunk-size     = 1*HEXDIG
//! last-chunk     = 1*("0") [ chunk-ext ] CRLF
//! ```
//!
//! The decoder is fed one character at a time and can stop and resume at any
//! character boundary. Chunk sizes count UTF-8 bytes, so each consumed
//! character decrements the remaining size by its encoded length.

use strum_macros::Display;

use crate::error::ChunkFramingError;
use wren_common::limits::DEFAULT_MAX_CHUNK_SIZE;

/// Decoder states, one per position in the chunked-body grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ChunkState {
    /// Reading `chunk-size` hex digits.
    ChunkSizeHex,
    /// Skipping `chunk-ext` up to the CR.
    ChunkExtension,
    /// Saw CR after the size line, expecting LF.
    ChunkSizeLineEnd,
    /// Reading `chunk-data`.
    ChunkData,
    /// Declared size consumed, expecting CR.
    ChunkDataEnd,
    /// Saw CR after chunk data, expecting LF.
    ChunkDataLineEnd,
    /// After `last-chunk`, at the start of a trailer line.
    Trailer,
    /// Skipping a trailer field line.
    TrailerField,
    /// Saw CR after a trailer field, expecting LF.
    TrailerLineEnd,
    /// Saw the CR of the final blank line, expecting LF.
    FinalCrlf,
    /// The body is complete.
    Finished,
}

/// Incremental decoder for one chunked body.
///
/// Instances are single-use: once [`is_finished`](Self::is_finished) reports
/// `true`, any further input is [`ChunkFramingError::TrailingData`].
#[derive(Debug, Clone)]
pub struct ChunkedBodyDecoder {
    state: ChunkState,
    size: usize,
    digits: usize,
    remaining: usize,
    current: String,
    segments: Vec<String>,
    max_chunk_size: usize,
}

impl ChunkedBodyDecoder {
    /// Create a decoder with the default chunk size ceiling.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_max_chunk_size(DEFAULT_MAX_CHUNK_SIZE)
    }

    /// Create a decoder that rejects chunks larger than `max_chunk_size`.
    #[must_use]
    pub const fn with_max_chunk_size(max_chunk_size: usize) -> Self {
        Self {
            state: ChunkState::ChunkSizeHex,
            size: 0,
            digits: 0,
            remaining: 0,
            current: String::new(),
            segments: Vec::new(),
            max_chunk_size,
        }
    }

    /// Current position in the grammar.
    #[must_use]
    pub const fn state(&self) -> ChunkState {
        self.state
    }

    /// Whether the final CRLF has been consumed.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.state == ChunkState::Finished
    }

    /// Completed chunk payloads, in arrival order.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The decoded body, or `None` while the body is still incomplete.
    #[must_use]
    pub fn body(&self) -> Option<String> {
        self.is_finished().then(|| self.segments.concat())
    }

    /// Consume the decoder at end of input.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkFramingError::Truncated`] if the last chunk and final
    /// CRLF have not been seen.
    pub fn finish(self) -> Result<String, ChunkFramingError> {
        if self.is_finished() {
            Ok(self.segments.concat())
        } else {
            Err(ChunkFramingError::Truncated)
        }
    }

    /// Feed a run of characters.
    ///
    /// # Errors
    ///
    /// Returns the first framing error encountered; see [`Self::receive_char`].
    pub fn receive(&mut self, text: &str) -> Result<(), ChunkFramingError> {
        text.chars().try_for_each(|c| self.receive_char(c))
    }

    /// Advance the state machine by one character.
    ///
    /// # Errors
    ///
    /// Returns a [`ChunkFramingError`] describing the first character that
    /// does not fit the chunked-body grammar.
    pub fn receive_char(&mut self, c: char) -> Result<(), ChunkFramingError> {
        let next = match self.state {
            ChunkState::ChunkSizeHex => self.handle_size_hex(c)?,
            ChunkState::ChunkExtension => match c {
                '\r' => ChunkState::ChunkSizeLineEnd,
                _ => ChunkState::ChunkExtension,
            },
            ChunkState::ChunkSizeLineEnd => {
                expect_line_feed(c)?;
                self.start_chunk()
            }
            ChunkState::ChunkData => self.handle_data(c)?,
            ChunkState::ChunkDataEnd => match c {
                '\r' => ChunkState::ChunkDataLineEnd,
                found => return Err(ChunkFramingError::DataOverrun { found }),
            },
            ChunkState::ChunkDataLineEnd => {
                expect_line_feed(c)?;
                ChunkState::ChunkSizeHex
            }
            ChunkState::Trailer => match c {
                '\r' => ChunkState::FinalCrlf,
                _ => ChunkState::TrailerField,
            },
            ChunkState::TrailerField => match c {
                '\r' => ChunkState::TrailerLineEnd,
                _ => ChunkState::TrailerField,
            },
            ChunkState::TrailerLineEnd => {
                expect_line_feed(c)?;
                ChunkState::Trailer
            }
            ChunkState::FinalCrlf => {
                expect_line_feed(c)?;
                tracing::debug!(chunks = self.segments.len(), "chunked body complete");
                ChunkState::Finished
            }
            ChunkState::Finished => return Err(ChunkFramingError::TrailingData),
        };
        if next != self.state {
            tracing::trace!(from = %self.state, to = %next, "chunk decoder transition");
        }
        self.state = next;
        Ok(())
    }

    fn handle_size_hex(&mut self, c: char) -> Result<ChunkState, ChunkFramingError> {
        match c {
            '\r' if self.digits == 0 => Err(ChunkFramingError::MissingSize),
            '\r' => Ok(ChunkState::ChunkSizeLineEnd),
            ';' | ' ' | '\t' if self.digits > 0 => Ok(ChunkState::ChunkExtension),
            _ => {
                let digit = c
                    .to_digit(16)
                    .ok_or(ChunkFramingError::InvalidSizeDigit(c))?;
                self.size = self
                    .size
                    .checked_mul(16)
                    .and_then(|size| size.checked_add(digit as usize))
                    .filter(|&size| size <= self.max_chunk_size)
                    .ok_or(ChunkFramingError::SizeOverflow {
                        limit: self.max_chunk_size,
                    })?;
                self.digits += 1;
                Ok(ChunkState::ChunkSizeHex)
            }
        }
    }

    /// Size line complete: either begin chunk data or, for the zero-size
    /// chunk, move on to the trailer section.
    fn start_chunk(&mut self) -> ChunkState {
        let size = std::mem::take(&mut self.size);
        self.digits = 0;
        if size == 0 {
            ChunkState::Trailer
        } else {
            self.remaining = size;
            ChunkState::ChunkData
        }
    }

    fn handle_data(&mut self, c: char) -> Result<ChunkState, ChunkFramingError> {
        let char_len = c.len_utf8();
        if char_len > self.remaining {
            return Err(ChunkFramingError::SplitCharacter {
                remaining: self.remaining,
                char_len,
            });
        }
        self.current.push(c);
        self.remaining -= char_len;
        if self.remaining == 0 {
            self.segments.push(std::mem::take(&mut self.current));
            Ok(ChunkState::ChunkDataEnd)
        } else {
            Ok(ChunkState::ChunkData)
        }
    }
}

impl Default for ChunkedBodyDecoder {
    fn default() -> Self {
        Self::new()
    }
}

const fn expect_line_feed(c: char) -> Result<(), ChunkFramingError> {
    if c == '\n' {
        Ok(())
    } else {
        Err(ChunkFramingError::MissingLineFeed { found: c })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_wikipedia_example() {
        let mut decoder = ChunkedBodyDecoder::new();
        decoder.receive("4\r\nWiki\r\n5\r\npedia\r\n0\r\n\r\n").unwrap();
        assert!(decoder.is_finished());
        assert_eq!(decoder.segments(), &["Wiki".to_string(), "pedia".to_string()]);
        assert_eq!(decoder.body().as_deref(), Some("Wikipedia"));
    }

    #[test]
    fn test_body_not_ready_until_final_crlf() {
        let mut decoder = ChunkedBodyDecoder::new();
        decoder.receive("4\r\nWiki\r\n0\r\n\r").unwrap();
        assert!(!decoder.is_finished());
        assert_eq!(decoder.body(), None);
        decoder.receive_char('\n').unwrap();
        assert_eq!(decoder.body().as_deref(), Some("Wiki"));
    }

    #[test]
    fn test_size_counts_utf8_bytes() {
        // "é" is two bytes, "ü" is two bytes.
        let mut decoder = ChunkedBodyDecoder::new();
        decoder.receive("4\r\néü\r\n0\r\n\r\n").unwrap();
        assert_eq!(decoder.finish(), Ok("éü".to_string()));
    }

    #[test]
    fn test_hex_sizes_accumulate() {
        let payload = "x".repeat(0x1a);
        let mut decoder = ChunkedBodyDecoder::new();
        decoder.receive(&format!("1A\r\n{payload}\r\n0\r\n\r\n")).unwrap();
        assert_eq!(decoder.finish(), Ok(payload));
    }

    #[test]
    fn test_chunk_extensions_are_skipped() {
        let mut decoder = ChunkedBodyDecoder::new();
        decoder.receive("3;name=value\r\nabc\r\n0;last\r\n\r\n").unwrap();
        assert_eq!(decoder.finish(), Ok("abc".to_string()));
    }

    #[test]
    fn test_trailer_fields_are_skipped() {
        let mut decoder = ChunkedBodyDecoder::new();
        decoder
            .receive("3\r\nabc\r\n0\r\nExpires: never\r\nX-Checksum: 1\r\n\r\n")
            .unwrap();
        assert_eq!(decoder.finish(), Ok("abc".to_string()));
    }

    #[test]
    fn test_character_straddling_chunk_end_is_rejected() {
        let mut decoder = ChunkedBodyDecoder::new();
        let err = decoder.receive("1\r\né\r\n0\r\n\r\n").unwrap_err();
        assert_eq!(
            err,
            ChunkFramingError::SplitCharacter {
                remaining: 1,
                char_len: 2
            }
        );
    }

    #[test]
    fn test_oversized_chunk_is_rejected() {
        let mut decoder = ChunkedBodyDecoder::with_max_chunk_size(0xff);
        let err = decoder.receive("100\r\n").unwrap_err();
        assert_eq!(err, ChunkFramingError::SizeOverflow { limit: 0xff });
    }

    #[test]
    fn test_truncated_body_fails_on_finish() {
        let mut decoder = ChunkedBodyDecoder::new();
        decoder.receive("4\r\nWi").unwrap();
        assert_eq!(decoder.state(), ChunkState::ChunkData);
        assert_eq!(decoder.finish(), Err(ChunkFramingError::Truncated));
    }

    #[test]
    fn test_data_after_finish_is_rejected() {
        let mut decoder = ChunkedBodyDecoder::new();
        decoder.receive("0\r\n\r\n").unwrap();
        assert_eq!(decoder.receive_char('x'), Err(ChunkFramingError::TrailingData));
    }
}
