//! Deduplicated warnings about unsupported input.
//!
//! A stylesheet full of `@media` blocks would otherwise log the same warning
//! hundreds of times. Each session owns its own [`Warnings`], so two sessions
//! never suppress each other's output.

use std::collections::HashSet;

/// Records which warnings a session has already emitted.
#[derive(Debug, Default, Clone)]
pub struct Warnings {
    seen: HashSet<String>,
}

impl Warnings {
    /// Create an empty warning log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit `message` at warn level the first time it is seen for `component`.
    ///
    /// Returns `true` if the warning was emitted, `false` if it was a repeat.
    ///
    /// # Example
    /// ```
    /// let mut warnings = wren_common::Warnings::new();
    /// assert!(warnings.warn_once("css", "unsupported at-rule @media"));
    /// assert!(!warnings.warn_once("css", "unsupported at-rule @media"));
    /// ```
    pub fn warn_once(&mut self, component: &str, message: &str) -> bool {
        let fresh = self.seen.insert(format!("[{component}] {message}"));
        if fresh {
            tracing::warn!(component, "{message}");
        }
        fresh
    }

    /// Number of distinct warnings emitted so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether no warning has been emitted yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Forget every recorded warning.
    pub fn clear(&mut self) {
        self.seen.clear();
    }
}
