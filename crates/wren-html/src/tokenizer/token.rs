use wren_dom::Attribute;

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// "The output of the tokenization step is a series of zero or more of the following
/// tokens: DOCTYPE, start tag, end tag, comment, character, end-of-file."
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `<!DOCTYPE name>`. Public and system identifiers are not kept.
    Doctype {
        /// "a name", missing for `<!DOCTYPE>`.
        name: Option<String>,
    },

    /// "Start and end tag tokens have a tag name, a self-closing flag, and a
    /// list of attributes, each of which has a name and a value."
    StartTag {
        /// Lowercase tag name.
        name: String,
        /// Set by a trailing `/>`.
        self_closing: bool,
        /// Attributes in source order; a repeated name keeps its first value.
        attributes: Vec<Attribute>,
    },

    /// End tag token, same shape as a start tag.
    EndTag {
        /// Lowercase tag name.
        name: String,
        /// Set by a trailing `/>`.
        self_closing: bool,
        /// Attributes in source order; ignored by the tree builder.
        attributes: Vec<Attribute>,
    },

    /// `<!-- data -->`.
    Comment {
        /// Text between the delimiters.
        data: String,
    },

    /// One character of text.
    Character {
        /// The character.
        data: char,
    },

    /// End-of-file token signals the end of input.
    EndOfFile,
}

impl Token {
    /// A DOCTYPE token with a missing name.
    #[must_use]
    pub const fn new_doctype() -> Self {
        Self::Doctype { name: None }
    }

    /// "When a start or end tag token is created, its self-closing flag must be
    /// unset, and its attributes list must be empty."
    #[must_use]
    pub const fn new_start_tag() -> Self {
        Self::StartTag {
            name: String::new(),
            self_closing: false,
            attributes: Vec::new(),
        }
    }

    /// Empty end tag token.
    #[must_use]
    pub const fn new_end_tag() -> Self {
        Self::EndTag {
            name: String::new(),
            self_closing: false,
            attributes: Vec::new(),
        }
    }

    /// Create a new comment token with empty data.
    #[must_use]
    pub const fn new_comment() -> Self {
        Self::Comment {
            data: String::new(),
        }
    }

    /// Returns true if this is an end-of-file token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self, Self::EndOfFile)
    }

    /// Tag name of a start or end tag token.
    #[must_use]
    pub fn tag_name(&self) -> Option<&str> {
        match self {
            Self::StartTag { name, .. } | Self::EndTag { name, .. } => Some(name),
            _ => None,
        }
    }

    // The mutators below are no-ops on a token of the wrong variant.

    pub(crate) fn append_to_doctype_name(&mut self, c: char) {
        if let Self::Doctype { name } = self {
            name.get_or_insert_with(String::new).push(c);
        }
    }

    pub(crate) fn append_to_tag_name(&mut self, c: char) {
        if let Self::StartTag { name, .. } | Self::EndTag { name, .. } = self {
            name.push(c);
        }
    }

    pub(crate) fn set_self_closing(&mut self) {
        if let Self::StartTag { self_closing, .. } | Self::EndTag { self_closing, .. } = self {
            *self_closing = true;
        }
    }

    pub(crate) fn append_to_comment(&mut self, s: &str) {
        if let Self::Comment { data } = self {
            data.push_str(s);
        }
    }

    /// Add `attribute` unless the tag already has one with the same name.
    ///
    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    /// "if there is already an attribute on the token with the exact same name
    /// ... the complete attribute's name must be removed from the token
    /// along with the value that gets associated with it"
    ///
    /// Returns `false` if the attribute was dropped as a duplicate.
    pub(crate) fn push_attribute(&mut self, attribute: Attribute) -> bool {
        if let Self::StartTag { attributes, .. } | Self::EndTag { attributes, .. } = self {
            if attributes.iter().any(|a| a.name == attribute.name) {
                return false;
            }
            attributes.push(attribute);
        }
        true
    }
}
