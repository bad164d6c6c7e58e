//! CSS Parser per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
//!
//! A character-level rendition of the stylesheet grammar: rules are split
//! into a selector prelude and a declaration block, and at-rules are skipped.
//! Values are kept as trimmed source text; nothing is interpreted.

use serde::Serialize;

/// [§ 5.4.6 Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-declaration)
///
/// A CSS declaration (e.g., `color: red`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Declaration {
    /// Lowercase property name.
    pub property: String,
    /// Value text with surrounding whitespace removed.
    pub value: String,
}

impl Declaration {
    /// Create a declaration, lowercasing the property name.
    #[must_use]
    pub fn new(property: &str, value: &str) -> Self {
        Self {
            property: property.trim().to_ascii_lowercase(),
            value: value.trim().to_string(),
        }
    }
}

/// [§ 5.4.3 Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-qualified-rule)
///
/// A CSS style rule (selectors + declarations).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleRule {
    /// [§ 5.1 Selector lists](https://www.w3.org/TR/selectors-4/#grouping)
    ///
    /// The comma-separated selectors of the prelude, whitespace collapsed.
    pub selectors: Vec<String>,
    /// Declarations in source order.
    pub declarations: Vec<Declaration>,
}

/// [§ 5.3.3 Parse a stylesheet](https://www.w3.org/TR/css-syntax-3/#parse-stylesheet)
///
/// A parsed CSS stylesheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Stylesheet {
    /// Style rules in source order. At-rules are not kept.
    pub rules: Vec<StyleRule>,
}

/// CSS parser over the characters of one stylesheet.
pub struct CSSParser {
    input: Vec<char>,
    position: usize,
    /// Input that was skipped, one message per occurrence.
    issues: Vec<String>,
}

impl CSSParser {
    /// Create a new parser. Comments are removed up front.
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self {
            input: strip_comments(text).chars().collect(),
            position: 0,
            issues: Vec::new(),
        }
    }

    /// Messages describing skipped at-rules and malformed input.
    #[must_use]
    pub fn issues(&self) -> &[String] {
        &self.issues
    }

    /// [§ 5.3.3 Parse a stylesheet](https://www.w3.org/TR/css-syntax-3/#parse-stylesheet)
    pub fn parse_stylesheet(&mut self) -> Stylesheet {
        let rules = self.consume_list_of_rules();
        Stylesheet { rules }
    }

    /// [§ 5.4.1 Consume a list of rules](https://www.w3.org/TR/css-syntax-3/#consume-list-of-rules)
    fn consume_list_of_rules(&mut self) -> Vec<StyleRule> {
        let mut rules = Vec::new();

        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => self.position += 1,
                None => return rules,
                // "<at-keyword-token>"
                Some('@') => self.consume_at_rule(),
                Some('}') => {
                    self.position += 1;
                    self.issues.push("unmatched '}' skipped".to_string());
                }
                Some(_) => {
                    if let Some(rule) = self.consume_qualified_rule() {
                        rules.push(rule);
                    }
                }
            }
        }
    }

    /// [§ 5.4.2 Consume an at-rule](https://www.w3.org/TR/css-syntax-3/#consume-at-rule)
    ///
    /// The rule is consumed up to its `;` or the end of its block and then
    /// dropped; none are supported.
    fn consume_at_rule(&mut self) {
        // Skip '@'
        self.position += 1;
        let start = self.position;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '-' || c == '_')
        {
            self.position += 1;
        }
        let name: String = self.input[start..self.position].iter().collect();
        self.issues.push(format!("unsupported at-rule @{name} skipped"));

        let _ = self.consume_until(&[';', '{']);
        if self.consume() == Some('{') {
            let _ = self.consume_simple_block();
        }
    }

    /// [§ 5.4.3 Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-qualified-rule)
    fn consume_qualified_rule(&mut self) -> Option<StyleRule> {
        let prelude = self.consume_until(&['{']);

        // "<EOF-token>: This is a parse error. Return nothing."
        if self.consume().is_none() {
            self.issues
                .push(format!("rule '{}' has no block", prelude.trim()));
            return None;
        }

        let block = self.consume_simple_block();
        let selectors = split_selector_list(&prelude);
        if selectors.is_empty() {
            self.issues.push("rule without a selector skipped".to_string());
            return None;
        }

        let declarations = self.consume_list_of_declarations(&block);
        Some(StyleRule {
            selectors,
            declarations,
        })
    }

    /// [§ 5.4.8 Consume a simple block](https://www.w3.org/TR/css-syntax-3/#consume-simple-block)
    ///
    /// Called after the opening `{`. Returns the contents up to the matching
    /// `}`, which is consumed.
    fn consume_simple_block(&mut self) -> String {
        let contents = self.consume_until(&['}']);
        let _ = self.consume();
        contents
    }

    /// [§ 5.4.5 Consume a list of declarations](https://www.w3.org/TR/css-syntax-3/#consume-list-of-declarations)
    fn consume_list_of_declarations(&mut self, block: &str) -> Vec<Declaration> {
        let mut declarations = Vec::new();
        for raw in split_top_level(block, ';') {
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            // [§ 5.4.6 Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-declaration)
            // "If the next token is anything other than a <colon-token>, this is a
            // parse error. Return nothing."
            match raw.split_once(':') {
                Some((property, value)) if is_property_name(property.trim()) => {
                    declarations.push(Declaration::new(property, value));
                }
                _ => self.issues.push(format!("malformed declaration '{raw}' dropped")),
            }
        }
        declarations
    }

    /// Consume characters up to (not including) the first of `stops` that is
    /// outside any string, parenthesis, bracket or nested brace block.
    fn consume_until(&mut self, stops: &[char]) -> String {
        let start = self.position;
        let mut depth = 0usize;
        let mut quote: Option<char> = None;

        while let Some(c) = self.peek() {
            if let Some(q) = quote {
                if c == '\\' {
                    self.position += 1;
                } else if c == q {
                    quote = None;
                }
            } else if depth == 0 && stops.contains(&c) {
                break;
            } else {
                match c {
                    '"' | '\'' => quote = Some(c),
                    '(' | '[' | '{' => depth += 1,
                    ')' | ']' | '}' if depth > 0 => depth -= 1,
                    _ => {}
                }
            }
            self.position += 1;
        }
        let end = self.position.min(self.input.len());
        self.input[start..end].iter().collect()
    }

    fn consume(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position += 1;
        Some(c)
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }
}

/// Parse stylesheet text, discarding issues.
#[must_use]
pub fn parse_stylesheet(text: &str) -> Stylesheet {
    CSSParser::new(text).parse_stylesheet()
}

/// [§ 3.3 Preprocessing](https://www.w3.org/TR/css-syntax-3/#consume-comments)
///
/// Remove every `/* ... */` comment that is not inside a string. An
/// unterminated comment runs to the end of input.
fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            out.push(c);
            if c == '\\' {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '/' if chars.peek() == Some(&'*') => {
                let _ = chars.next();
                let mut previous = '\0';
                for inner in chars.by_ref() {
                    if previous == '*' && inner == '/' {
                        break;
                    }
                    previous = inner;
                }
                // A comment separates tokens like whitespace does.
                out.push(' ');
            }
            '"' | '\'' => {
                quote = Some(c);
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

/// Split `text` on `separator` wherever it is outside strings and brackets.
fn split_top_level(text: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in text.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            _ if c == separator && depth == 0 => {
                parts.push(&text[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

/// [§ 5.1 Selector lists](https://www.w3.org/TR/selectors-4/#grouping)
///
/// "A selector list is a comma-separated list of selectors"
fn split_selector_list(prelude: &str) -> Vec<String> {
    split_top_level(prelude, ',')
        .into_iter()
        .map(|part| part.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|selector| !selector.is_empty())
        .collect()
}

/// Property names are identifiers, optionally custom (`--x`).
fn is_property_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_rule() {
        let sheet = parse_stylesheet("p { color: red; margin : 0 }");
        assert_eq!(
            sheet.rules,
            vec![StyleRule {
                selectors: vec!["p".to_string()],
                declarations: vec![
                    Declaration::new("color", "red"),
                    Declaration::new("margin", "0"),
                ],
            }]
        );
    }

    #[test]
    fn test_property_names_are_lowercased() {
        let sheet = parse_stylesheet("p { COLOR: Red }");
        assert_eq!(sheet.rules[0].declarations[0].property, "color");
        assert_eq!(sheet.rules[0].declarations[0].value, "Red");
    }

    #[test]
    fn test_selector_list_and_whitespace() {
        let sheet = parse_stylesheet("div   p,\n#main .x { a: b }");
        assert_eq!(sheet.rules[0].selectors, vec!["div p", "#main .x"]);
    }

    #[test]
    fn test_comments_are_stripped() {
        let sheet = parse_stylesheet("/* a { b: c } */ p /* x */ { color: /* y */ red }");
        assert_eq!(sheet.rules.len(), 1);
        assert_eq!(sheet.rules[0].selectors, vec!["p"]);
        assert_eq!(sheet.rules[0].declarations[0].value, "red");
    }

    #[test]
    fn test_comment_markers_inside_strings_are_kept() {
        let sheet = parse_stylesheet(r#"p { content: "/* not a comment */" }"#);
        assert_eq!(
            sheet.rules[0].declarations[0].value,
            r#""/* not a comment */""#
        );
    }

    #[test]
    fn test_value_with_colon_and_semicolon_in_string() {
        let sheet = parse_stylesheet(r#"a { background: url("x;y:z.png"); color: blue }"#);
        let decls = &sheet.rules[0].declarations;
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[0].value, r#"url("x;y:z.png")"#);
        assert_eq!(decls[1].value, "blue");
    }

    #[test]
    fn test_at_rules_are_skipped() {
        let mut parser = CSSParser::new(
            "@import url(a.css);\n@media screen { p { color: red } }\nh1 { font-weight: bold }",
        );
        let sheet = parser.parse_stylesheet();
        assert_eq!(sheet.rules.len(), 1);
        assert_eq!(sheet.rules[0].selectors, vec!["h1"]);
        assert_eq!(parser.issues().len(), 2);
        assert!(parser.issues()[1].contains("@media"));
    }

    #[test]
    fn test_malformed_declarations_are_dropped() {
        let mut parser = CSSParser::new("p { color red; : x; margin: 0 }");
        let sheet = parser.parse_stylesheet();
        assert_eq!(
            sheet.rules[0].declarations,
            vec![Declaration::new("margin", "0")]
        );
        assert_eq!(parser.issues().len(), 2);
    }

    #[test]
    fn test_rule_without_block() {
        let mut parser = CSSParser::new("p { color: red } div");
        let sheet = parser.parse_stylesheet();
        assert_eq!(sheet.rules.len(), 1);
        assert_eq!(parser.issues().len(), 1);
    }

    #[test]
    fn test_unclosed_block_runs_to_end() {
        let sheet = parse_stylesheet("p { color: red");
        assert_eq!(
            sheet.rules[0].declarations,
            vec![Declaration::new("color", "red")]
        );
    }

    #[test]
    fn test_empty_stylesheet() {
        assert!(parse_stylesheet("  \n ").rules.is_empty());
    }
}
