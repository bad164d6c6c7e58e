//! CSS Cascading and Style Computation
//!
//! A reduced form of
//! [CSS Cascading and Inheritance Level 4](https://www.w3.org/TR/css-cascade-4/):
//! one origin, no `!important`, no inheritance. Declarations compete only on
//! specificity, and on a tie the value assigned first stays.

use wren_dom::style::Specificity;
use wren_dom::{DomTree, NodeId};

use crate::rule_store::CssRuleStore;

/// Resolves computed styles for elements of a tree against a rule store.
#[derive(Debug, Clone, Copy)]
pub struct StyleResolver<'a> {
    store: &'a CssRuleStore,
}

impl<'a> StyleResolver<'a> {
    /// Create a resolver over the rules currently in `store`.
    #[must_use]
    pub const fn new(store: &'a CssRuleStore) -> Self {
        Self { store }
    }

    /// [§ 6 Cascading](https://www.w3.org/TR/css-cascade-4/#cascading)
    ///
    /// Apply every matching rule to the computed style of `element`.
    ///
    /// For each declaration of a matching rule: a property with no entry is
    /// set; an existing entry is replaced only when the rule's specificity is
    /// strictly greater. Running this twice leaves the style unchanged.
    /// Does nothing if `element` is not an element.
    pub fn compute_css(&self, tree: &mut DomTree, element: NodeId) {
        let chain = tree.ancestor_chain(element);
        let matched: Vec<(&str, &str, Specificity)> = self
            .store
            .rules()
            .iter()
            .filter(|rule| rule.selector.matches(tree, element, &chain))
            .flat_map(|rule| {
                let specificity = rule.selector.specificity();
                rule.declarations
                    .iter()
                    .map(move |d| (d.property.as_str(), d.value.as_str(), specificity))
            })
            .collect();

        let Some(data) = tree.as_element_mut(element) else {
            return;
        };
        let style = &mut data.computed_style;
        for (property, value, specificity) in matched {
            // [§ 6.4.3 Specificity](https://www.w3.org/TR/css-cascade-4/#cascade-specificity)
            let wins = style
                .declared(property)
                .is_none_or(|existing| specificity > existing.specificity);
            if wins {
                style.set(property, value, specificity);
            }
        }
    }

    /// Compute styles for every element in document order.
    pub fn resolve_tree(&self, tree: &mut DomTree) {
        let elements = tree.elements();
        tracing::debug!(
            elements = elements.len(),
            rules = self.store.len(),
            "resolving styles"
        );
        for id in elements {
            self.compute_css(tree, id);
        }
    }
}
