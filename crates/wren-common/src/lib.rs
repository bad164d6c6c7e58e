//! Common utilities for the Wren pipeline.
//!
//! This crate provides shared infrastructure used by every engine:
//! - **Limits** - resource ceilings enforced by the HTTP and HTML parsers
//! - **Logging** - `tracing` subscriber bootstrap for binaries and tests
//! - **Warnings** - per-session deduplication of "unsupported input" warnings

pub mod limits;
pub mod logging;
pub mod warning;

pub use limits::Limits;
pub use warning::Warnings;
