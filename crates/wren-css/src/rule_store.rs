//! Ordered rule storage for one document session.

use serde::Serialize;
use wren_common::Warnings;
use wren_dom::style::Specificity;

use crate::parser::{CSSParser, Declaration};
use crate::selector::Selector;

/// One stored rule: the first selector of a parsed style rule and its
/// declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssRule {
    /// Parsed selector, with its specificity.
    pub selector: Selector,
    /// Declarations in source order.
    pub declarations: Vec<Declaration>,
}

/// Serialized view of a rule: selector text, specificity and declarations.
#[derive(Serialize)]
struct RuleView<'a> {
    selector: &'a str,
    specificity: Specificity,
    declarations: &'a [Declaration],
}

impl Serialize for CssRule {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        RuleView {
            selector: self.selector.text(),
            specificity: self.selector.specificity(),
            declarations: &self.declarations,
        }
        .serialize(serializer)
    }
}

/// Rules collected from every stylesheet loaded into a session, in load
/// order. Rule order is what breaks specificity ties.
#[derive(Debug, Clone, Default)]
pub struct CssRuleStore {
    rules: Vec<CssRule>,
    warnings: Warnings,
}

impl CssRuleStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `stylesheet` and append its rules after the ones already held.
    ///
    /// Only the first selector of a comma-separated list is kept. Skipped
    /// input is reported once per distinct message.
    pub fn collect_css_rules(&mut self, stylesheet: &str) {
        let mut parser = CSSParser::new(stylesheet);
        let sheet = parser.parse_stylesheet();
        for issue in parser.issues() {
            let _ = self.warnings.warn_once("css", issue);
        }

        let before = self.rules.len();
        for rule in sheet.rules {
            if rule.selectors.len() > 1 {
                let _ = self.warnings.warn_once(
                    "css",
                    &format!(
                        "selector list '{}' reduced to its first selector",
                        rule.selectors.join(", ")
                    ),
                );
            }
            let Some(first) = rule.selectors.first() else {
                continue;
            };
            self.rules.push(CssRule {
                selector: Selector::parse(first),
                declarations: rule.declarations,
            });
        }
        tracing::debug!(
            added = self.rules.len() - before,
            total = self.rules.len(),
            "collected css rules"
        );
    }

    /// Stored rules in load order.
    #[must_use]
    pub fn rules(&self) -> &[CssRule] {
        &self.rules
    }

    /// Number of stored rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no rule has been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Warnings emitted while collecting.
    #[must_use]
    pub const fn warnings(&self) -> &Warnings {
        &self.warnings
    }
}
