//! Incremental HTTP/1.1 response parsing.
//!
//! This crate turns the raw text of a response into an [`HttpResponse`]:
//! - **Status line** - version, three-digit code, reason phrase
//! - **Header block** - field lines up to the blank line
//! - **Body** - chunked ([`ChunkedBodyDecoder`]), `Content-Length`, or read
//!   until the connection closes
//!
//! Both state machines accept input in arbitrarily small pieces. Neither
//! holds any global state; each response gets its own parser.

mod chunked;
mod error;
mod parser;
mod response;

pub use chunked::{ChunkState, ChunkedBodyDecoder};
pub use error::{ChunkFramingError, HttpError};
pub use parser::{ParserState, ResponseParser};
pub use response::{HttpResponse, HttpVersion, StatusLine, status_disallows_body};

/// Parse a complete response held in memory.
///
/// # Errors
///
/// Returns the first [`HttpError`] raised while parsing, including the
/// end-of-input checks performed by [`ResponseParser::finish`].
pub fn parse_response(raw: &[u8]) -> Result<HttpResponse, HttpError> {
    let mut parser = ResponseParser::new();
    parser.receive_bytes(raw)?;
    if !parser.is_finished() {
        parser.finish()?;
    }
    parser.into_response()
}
