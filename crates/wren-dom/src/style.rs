//! Computed-style annotations carried by every element.

use std::collections::BTreeMap;

use serde::Serialize;

/// [§ 17 Calculating Specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)
///
/// Specificity as `(inline, id, class, type)`.
///
/// "Specificities are compared by comparing the three components in order",
/// with the inline component placed in front of them. The derived `Ord`
/// compares the fields left to right, which is exactly that order. Rules from a
/// stylesheet always have an inline component of 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash, Serialize)]
pub struct Specificity(pub u32, pub u32, pub u32, pub u32);

impl Specificity {
    /// Specificity of a selector with no id, class or type segments.
    pub const ZERO: Self = Self(0, 0, 0, 0);

    /// Create a specificity from its four components.
    #[must_use]
    pub const fn new(inline: u32, ids: u32, classes: u32, types: u32) -> Self {
        Self(inline, ids, classes, types)
    }

    /// Inline style component.
    #[must_use]
    pub const fn inline(self) -> u32 {
        self.0
    }

    /// Count of id selectors.
    #[must_use]
    pub const fn ids(self) -> u32 {
        self.1
    }

    /// Count of class selectors.
    #[must_use]
    pub const fn classes(self) -> u32 {
        self.2
    }

    /// Count of type selectors.
    #[must_use]
    pub const fn types(self) -> u32 {
        self.3
    }
}

/// The winning declared value of one property and the specificity that won it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeclaredValue {
    /// Declaration value, exactly as written after trimming.
    pub value: String,
    /// Specificity of the rule that supplied `value`.
    pub specificity: Specificity,
}

/// Property name to resolved value for one element.
///
/// Keys are kept sorted so dumps and JSON output are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ComputedStyle {
    properties: BTreeMap<String, DeclaredValue>,
}

impl ComputedStyle {
    /// Create an empty style.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The resolved value for `property`, if any rule set it.
    #[must_use]
    pub fn get(&self, property: &str) -> Option<&str> {
        self.properties.get(property).map(|d| d.value.as_str())
    }

    /// The full entry for `property`, including its specificity.
    #[must_use]
    pub fn declared(&self, property: &str) -> Option<&DeclaredValue> {
        self.properties.get(property)
    }

    /// Store `value` for `property`, replacing any previous entry.
    pub fn set(&mut self, property: &str, value: &str, specificity: Specificity) {
        let _ = self.properties.insert(
            property.to_string(),
            DeclaredValue {
                value: value.to_string(),
                specificity,
            },
        );
    }

    /// Iterate over `(property, entry)` pairs in property-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DeclaredValue)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of properties with a resolved value.
    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether no property has been resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}
