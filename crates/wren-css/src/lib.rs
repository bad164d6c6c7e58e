//! Stylesheet parsing and style resolution for the Wren pipeline.
//!
//! # Scope
//!
//! This crate implements:
//! - **Stylesheet parsing** ([CSS Syntax § 5](https://www.w3.org/TR/css-syntax-3/#parsing))
//!   - Style rules with selector lists and declaration blocks
//!   - Comments stripped, at-rules skipped
//!
//! - **Selector matching** ([Selectors Level 4](https://www.w3.org/TR/selectors-4/))
//!   - `#id`, `.class` and type selectors joined by descendant combinators
//!
//! - **Cascade** ([CSS Cascade § 6](https://www.w3.org/TR/css-cascade-4/#cascading))
//!   - Specificity ordering with first-assigned tie breaking
//!
//! # Not Yet Implemented
//!
//! - Compound selectors, other combinators, pseudo-classes
//! - `!important`, origins, inheritance and value computation

/// CSS Cascading and style computation.
pub mod cascade;
/// Stylesheet parser.
pub mod parser;
/// Per-session rule storage.
pub mod rule_store;
/// Selector parsing and matching.
pub mod selector;

pub use cascade::StyleResolver;
pub use parser::{CSSParser, Declaration, StyleRule, Stylesheet, parse_stylesheet};
pub use rule_store::{CssRule, CssRuleStore};
pub use selector::{Selector, SimpleSelector, calculate_specificity};

use wren_dom::DomTree;

/// [§ 4.2.6 The style element](https://html.spec.whatwg.org/multipage/semantics.html#the-style-element)
///
/// The text content of every `<style>` element, one stylesheet per element,
/// in document order.
#[must_use]
pub fn extract_style_content(tree: &DomTree) -> Vec<String> {
    tree.elements()
        .into_iter()
        .filter(|&id| {
            tree.as_element(id)
                .is_some_and(|data| data.tag_name.eq_ignore_ascii_case("style"))
        })
        .map(|id| tree.text_content(id))
        .collect()
}
