//! Document loading for the Wren pipeline.
//!
//! # Scope
//!
//! This crate provides:
//! - **Document Loading** - decode an HTTP response and parse its HTML body
//! - **Style Computation** - collect `<style>` sheets and resolve every element
//! - **Inspection** - serialize the styled tree to JSON
//!
//! ```
//! let session = wren_core::DocumentSession::new();
//! let raw = b"HTTP/1.1 200 OK\r\nContent-Length: 47\r\n\r\n<style>p { color: red }</style><p id=\"x\">hi</p>";
//! let document = session.load_response(raw).unwrap();
//! let p = document.elements_by_tag_name("p")[0];
//! assert_eq!(document.computed_style(p).unwrap().get("color"), Some("red"));
//! ```
//!
//! # Not Yet Implemented
//!
//! - Network requests
//! - External stylesheets (`<link rel="stylesheet">`)

pub use wren_css as css;
pub use wren_dom as dom;
pub use wren_html as html;
pub use wren_http as http;

mod document;
mod error;
mod session;

pub use document::StyledDocument;
pub use error::LoadError;
pub use session::DocumentSession;
