//! CSS Selector parsing and matching
//!
//! Only descendant combinators between simple selectors are supported, per
//! [Selectors Level 4](https://www.w3.org/TR/selectors-4/): `#id`, `.class`
//! and type selectors separated by whitespace.

use wren_dom::style::Specificity;
use wren_dom::{DomTree, ElementData, NodeId};

/// [§ 5 Elemental selectors](https://www.w3.org/TR/selectors-4/#elemental-selectors)
///
/// A simple selector is a single condition on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    ///
    /// Examples: `div`, `p`, `h1`
    Type(String),

    /// [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
    ///
    /// Compared against the whole `class` attribute, so `.a` does not match
    /// `class="a b"`. Everything after the `.` is the class text: `.a.b`
    /// matches `class="a.b"` only.
    Class(String),

    /// [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
    ///
    /// Examples: `#main`, `#nav-bar`. Like [`Class`](Self::Class), the text
    /// after `#` is compared as is.
    Id(String),

    /// Any other syntax (`*`, `a:hover`, `[href]`, `p.x`, `>`, a bare `#` or
    /// `.`). Never matches.
    Unsupported(String),
}

impl SimpleSelector {
    /// Classify one whitespace-free selector segment.
    #[must_use]
    pub fn parse(segment: &str) -> Self {
        let unsupported = || Self::Unsupported(segment.to_string());
        if let Some(id) = segment.strip_prefix('#').filter(|id| !id.is_empty()) {
            return Self::Id(id.to_string());
        }
        if let Some(class) = segment.strip_prefix('.').filter(|class| !class.is_empty()) {
            return Self::Class(class.to_string());
        }
        if segment.starts_with(|c: char| c.is_ascii_alphabetic()) && is_name(segment) {
            return Self::Type(segment.to_ascii_lowercase());
        }
        unsupported()
    }

    /// Whether `element` satisfies this condition.
    #[must_use]
    pub fn matches(&self, element: &ElementData) -> bool {
        match self {
            Self::Type(name) => element.tag_name.eq_ignore_ascii_case(name),
            Self::Class(class) => element.class() == Some(class.as_str()),
            Self::Id(id) => element.id() == Some(id.as_str()),
            Self::Unsupported(_) => false,
        }
    }
}

/// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
///
/// A chain of simple selectors joined by descendant combinators, e.g.
/// `div .note p`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    text: String,
    segments: Vec<SimpleSelector>,
    specificity: Specificity,
}

impl Selector {
    /// Parse selector text. Segments are separated by whitespace.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let segments = text.split_whitespace().map(SimpleSelector::parse).collect();
        Self {
            text: text.split_whitespace().collect::<Vec<_>>().join(" "),
            segments,
            specificity: calculate_specificity(text),
        }
    }

    /// The selector text, whitespace collapsed.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Simple selectors from outermost to the subject.
    #[must_use]
    pub fn segments(&self) -> &[SimpleSelector] {
        &self.segments
    }

    /// Specificity shared by every declaration of the rule.
    #[must_use]
    pub const fn specificity(&self) -> Specificity {
        self.specificity
    }

    /// [§ 16.1 Descendant combinator](https://www.w3.org/TR/selectors-4/#descendant-combinators)
    ///
    /// "A descendant combinator is whitespace that separates two compound
    /// selectors. A selector of the form A B represents an element B that is an
    /// arbitrary descendant of some ancestor element A."
    ///
    /// `chain` holds the element ancestors of `element`, outermost first, as
    /// returned by [`DomTree::ancestor_chain`].
    ///
    /// Matching runs right to left: the last segment must match the element,
    /// then ancestors are walked nearest first and each one that matches the
    /// next pending segment consumes it. Ancestors that match nothing are
    /// skipped.
    #[must_use]
    pub fn matches(&self, tree: &DomTree, element: NodeId, chain: &[NodeId]) -> bool {
        let Some((subject, rest)) = self.segments.split_last() else {
            return false;
        };
        if !tree.as_element(element).is_some_and(|e| subject.matches(e)) {
            return false;
        }

        let mut pending = rest.len();
        for &ancestor in chain.iter().rev() {
            if pending == 0 {
                break;
            }
            if tree
                .as_element(ancestor)
                .is_some_and(|e| rest[pending - 1].matches(e))
            {
                pending -= 1;
            }
        }
        pending == 0
    }
}

/// [§ 17 Calculating Specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)
///
/// Counted per whitespace-separated segment by its first character: `#`
/// counts as an ID, `.` as a class, an ASCII letter as a type. Anything else
/// counts for nothing. The inline component is always zero for stylesheet
/// rules.
#[must_use]
pub fn calculate_specificity(text: &str) -> Specificity {
    let (mut ids, mut classes, mut types) = (0, 0, 0);
    for segment in text.split_whitespace() {
        match segment.chars().next() {
            Some('#') => ids += 1,
            Some('.') => classes += 1,
            Some(c) if c.is_ascii_alphabetic() => types += 1,
            _ => {}
        }
    }
    Specificity::new(0, ids, classes, types)
}

/// Identifier characters accepted in type selectors.
fn is_name(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use wren_dom::{Attribute, NodeType};

    fn element(tag: &str, attrs: &[(&str, &str)]) -> NodeType {
        NodeType::Element(ElementData::new(
            tag,
            attrs.iter().map(|(n, v)| Attribute::new(*n, *v)).collect(),
        ))
    }

    #[test]
    fn test_parse_simple_selectors() {
        assert_eq!(SimpleSelector::parse("#x"), SimpleSelector::Id("x".into()));
        assert_eq!(
            SimpleSelector::parse(".note"),
            SimpleSelector::Class("note".into())
        );
        assert_eq!(SimpleSelector::parse("DIV"), SimpleSelector::Type("div".into()));
        assert!(matches!(
            SimpleSelector::parse("a:hover"),
            SimpleSelector::Unsupported(_)
        ));
        assert!(matches!(SimpleSelector::parse("*"), SimpleSelector::Unsupported(_)));
        assert!(matches!(SimpleSelector::parse("#"), SimpleSelector::Unsupported(_)));
        assert!(matches!(SimpleSelector::parse("."), SimpleSelector::Unsupported(_)));
    }

    #[test]
    fn test_id_and_class_text_is_compared_literally() {
        assert_eq!(SimpleSelector::parse("#a.b"), SimpleSelector::Id("a.b".into()));
        assert_eq!(
            SimpleSelector::parse(".x:hover"),
            SimpleSelector::Class("x:hover".into())
        );

        let mut tree = DomTree::new();
        let dotted = tree
            .append(NodeId::ROOT, element("p", &[("id", "a.b"), ("class", "x:hover")]))
            .unwrap();
        let plain = tree
            .append(NodeId::ROOT, element("p", &[("id", "a"), ("class", "x")]))
            .unwrap();
        let by_id = Selector::parse("#a.b");
        let by_class = Selector::parse(".x:hover");
        assert!(by_id.matches(&tree, dotted, &[]));
        assert!(!by_id.matches(&tree, plain, &[]));
        assert!(by_class.matches(&tree, dotted, &[]));
        assert!(!by_class.matches(&tree, plain, &[]));
    }

    #[test]
    fn test_specificity_counts() {
        assert_eq!(
            calculate_specificity("#a .b c .d"),
            Specificity::new(0, 1, 2, 1)
        );
        // Counted by first character even when the segment cannot match.
        assert_eq!(calculate_specificity("a:hover *"), Specificity::new(0, 0, 0, 1));
    }

    #[test]
    fn test_non_contiguous_ancestors() {
        let mut tree = DomTree::new();
        let div = tree.append(NodeId::ROOT, element("div", &[])).unwrap();
        let section = tree.append(div, element("section", &[])).unwrap();
        let p = tree.append(section, element("p", &[])).unwrap();
        let chain = tree.ancestor_chain(p);

        assert!(Selector::parse("div p").matches(&tree, p, &chain));
        assert!(Selector::parse("div section p").matches(&tree, p, &chain));
        assert!(!Selector::parse("section div p").matches(&tree, p, &chain));
        assert!(!Selector::parse("div").matches(&tree, p, &chain));
    }

    #[test]
    fn test_class_is_exact_string() {
        let mut tree = DomTree::new();
        let p = tree
            .append(NodeId::ROOT, element("p", &[("class", "a b")]))
            .unwrap();
        assert!(!Selector::parse(".a").matches(&tree, p, &[]));
        assert_eq!(Selector::parse(".a b").segments().len(), 2);
    }

    #[test]
    fn test_empty_selector_never_matches() {
        let mut tree = DomTree::new();
        let p = tree.append(NodeId::ROOT, element("p", &[])).unwrap();
        assert!(!Selector::parse("   ").matches(&tree, p, &[]));
    }
}
