//! HTML parser module for tree construction.

/// Incremental parser driving the tokenizer and tree builder.
pub mod core;
/// Token-to-tree construction over a stack of open elements.
pub mod tree_builder;

pub use core::HTMLParser;
pub use tree_builder::TreeBuilder;
