//! Resource limits shared by the parsers.
//!
//! Every field has a default, and a partially specified limits table (for
//! example a `[limits]` section in an embedding application's config file)
//! fills the remaining fields from [`Limits::default`].

use serde::{Deserialize, Serialize};

/// Default ceiling on a single header line, in bytes.
pub const DEFAULT_MAX_HEADER_LINE_BYTES: usize = 8 * 1024;

/// Default ceiling on the number of header fields in one response.
pub const DEFAULT_MAX_HEADER_COUNT: usize = 100;

/// Default ceiling on a single declared chunk size.
pub const DEFAULT_MAX_CHUNK_SIZE: usize = 16 * 1024 * 1024;

/// Default ceiling on the depth of the open-element stack.
pub const DEFAULT_MAX_OPEN_ELEMENTS: usize = 512;

/// Resource ceilings applied while parsing untrusted input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Longest accepted status or header line, in UTF-8 bytes.
    pub max_header_line_bytes: usize,
    /// Most header fields accepted in one response.
    pub max_header_count: usize,
    /// Largest chunk size a chunked body may declare.
    pub max_chunk_size: usize,
    /// Deepest open-element stack the tree builder will grow to.
    pub max_open_elements: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_header_line_bytes: DEFAULT_MAX_HEADER_LINE_BYTES,
            max_header_count: DEFAULT_MAX_HEADER_COUNT,
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
            max_open_elements: DEFAULT_MAX_OPEN_ELEMENTS,
        }
    }
}
