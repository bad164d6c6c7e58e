//! Errors from loading a document.

use thiserror::Error;
use wren_html::HtmlParseError;
use wren_http::HttpError;

/// Why a document could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The response bytes were not a valid HTTP/1.1 response.
    #[error("http: {0}")]
    Http(#[from] HttpError),
    /// The body was not acceptable HTML.
    #[error("html: {0}")]
    Html(#[from] HtmlParseError),
    /// The response has no body to parse, e.g. `204 No Content`.
    #[error("response {status} has no body")]
    MissingBody {
        /// Status code of the response.
        status: String,
    },
}
