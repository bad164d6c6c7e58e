//! Error types for response parsing.

use thiserror::Error;

/// Why a chunked body could not be framed.
///
/// [RFC 9112 § 7.1](https://www.rfc-editor.org/rfc/rfc9112#section-7.1)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChunkFramingError {
    /// A chunk-size line contained something other than a hex digit.
    #[error("invalid chunk size digit {0:?}")]
    InvalidSizeDigit(char),
    /// A chunk-size line ended before any hex digit.
    #[error("chunk size line has no digits")]
    MissingSize,
    /// The declared chunk size exceeds the configured maximum.
    #[error("chunk size exceeds limit of {limit} bytes")]
    SizeOverflow {
        /// Configured maximum chunk size.
        limit: usize,
    },
    /// A CR was followed by something other than LF.
    #[error("expected LF after CR, found {found:?}")]
    MissingLineFeed {
        /// The character found instead of LF.
        found: char,
    },
    /// Chunk data ran past its declared size instead of ending with CRLF.
    #[error("chunk data longer than declared, found {found:?} where CRLF was expected")]
    DataOverrun {
        /// The first character past the declared size.
        found: char,
    },
    /// A multi-byte character straddles the end of the declared chunk size.
    #[error("{char_len}-byte character does not fit in the {remaining} bytes left in the chunk")]
    SplitCharacter {
        /// Bytes left in the chunk.
        remaining: usize,
        /// UTF-8 length of the offending character.
        char_len: usize,
    },
    /// Input ended before the last chunk and its terminating CRLF.
    #[error("input ended before the last chunk")]
    Truncated,
    /// Input continued after the final CRLF.
    #[error("data after the last chunk")]
    TrailingData,
}

/// Errors returned by [`crate::ResponseParser`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpError {
    /// The first line is not `HTTP/<d>.<d> <3 digits> <reason>`.
    #[error("invalid status line `{line}`")]
    InvalidStatusLine {
        /// The offending line, without its CRLF.
        line: String,
    },
    /// A header line has no colon, an empty name, or a bare line ending.
    #[error("invalid header line `{line}`")]
    InvalidHeaderLine {
        /// The offending line as far as it was read.
        line: String,
    },
    /// Input ended before the blank line closing the header block.
    #[error("input ended inside the header block")]
    UnterminatedHeaderBlock,
    /// A header line or the header count exceeded its limit.
    #[error("header section too large: more than {limit} {unit}")]
    HeaderTooLarge {
        /// The configured limit that was crossed.
        limit: usize,
        /// What the limit counts.
        unit: &'static str,
    },
    /// The chunked body is malformed.
    #[error("chunk framing error: {0}")]
    ChunkFraming(#[from] ChunkFramingError),
    /// `Content-Length` is not a decimal byte count.
    #[error("invalid Content-Length `{value}`")]
    InvalidContentLength {
        /// The raw header value.
        value: String,
    },
    /// A `Content-Length` body did not match its declared length.
    #[error("body has {received} bytes but Content-Length declared {expected}")]
    BodyLengthMismatch {
        /// Declared length.
        expected: usize,
        /// Bytes received when the mismatch was detected.
        received: usize,
    },
    /// Received bytes are not valid UTF-8.
    #[error("response is not valid UTF-8 near byte {offset}")]
    InvalidEncoding {
        /// Offset of the invalid sequence within the failing read.
        offset: usize,
    },
    /// Input continued after the response was complete.
    #[error("unexpected data after the end of the message")]
    UnexpectedDataAfterMessage,
    /// The response was requested before it was complete.
    #[error("response is not complete yet")]
    NotReady,
}
