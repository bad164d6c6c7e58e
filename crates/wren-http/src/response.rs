//! The decoded response and its status line.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::error::HttpError;

/// [RFC 9112 § 2.3 HTTP Version](https://www.rfc-editor.org/rfc/rfc9112#section-2.3)
///
/// `HTTP-version = HTTP-name "/" DIGIT "." DIGIT`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HttpVersion {
    /// Major version digit.
    pub major: u8,
    /// Minor version digit.
    pub minor: u8,
}

impl HttpVersion {
    /// `HTTP/1.1`.
    pub const HTTP_11: Self = Self { major: 1, minor: 1 };
    /// `HTTP/1.0`.
    pub const HTTP_10: Self = Self { major: 1, minor: 0 };

    fn parse(text: &str) -> Option<Self> {
        let digits = text.strip_prefix("HTTP/")?.as_bytes();
        match digits {
            [major, b'.', minor] if major.is_ascii_digit() && minor.is_ascii_digit() => Some(Self {
                major: major - b'0',
                minor: minor - b'0',
            }),
            _ => None,
        }
    }
}

impl fmt::Display for HttpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP/{}.{}", self.major, self.minor)
    }
}

/// [RFC 9112 § 4 Status Line](https://www.rfc-editor.org/rfc/rfc9112#section-4)
///
/// `status-line = HTTP-version SP status-code SP [ reason-phrase ]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    /// Protocol version.
    pub version: HttpVersion,
    /// Three-digit status code as received.
    pub status_code: String,
    /// Reason phrase, possibly empty.
    pub reason: String,
}

impl StatusLine {
    /// Parse a status line without its trailing CRLF.
    ///
    /// A missing SP before an empty reason phrase is tolerated.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::InvalidStatusLine`] when the version or the status
    /// code is malformed.
    pub fn parse(line: &str) -> Result<Self, HttpError> {
        let invalid = || HttpError::InvalidStatusLine {
            line: line.to_string(),
        };

        let (version, rest) = line.split_once(' ').ok_or_else(invalid)?;
        let version = HttpVersion::parse(version).ok_or_else(invalid)?;
        let (code, reason) = rest.split_once(' ').unwrap_or((rest, ""));
        if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        Ok(Self {
            version,
            status_code: code.to_string(),
            reason: reason.to_string(),
        })
    }

    /// The status code as a number.
    #[must_use]
    pub fn code(&self) -> u16 {
        self.status_code.parse().unwrap_or_default()
    }
}

/// [RFC 9112 § 6.3](https://www.rfc-editor.org/rfc/rfc9112#section-6.3)
///
/// "Any response to a HEAD request and any response with a 1xx
/// (Informational), 204 (No Content), or 304 (Not Modified) status code is
/// always terminated by the first empty line after the header fields"
#[must_use]
pub fn status_disallows_body(status_code: u16) -> bool {
    (100..200).contains(&status_code) || status_code == 204 || status_code == 304
}

/// A fully received response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HttpResponse {
    /// Protocol version from the status line.
    pub version: HttpVersion,
    /// Three-digit status code as received, e.g. `"200"`.
    pub status_code: String,
    /// Reason phrase, possibly empty.
    pub reason: String,
    /// Header fields keyed by name exactly as received. A repeated name
    /// keeps the last value.
    pub headers: HashMap<String, String>,
    /// Decoded body; `None` when the status code forbids one.
    pub body: Option<String>,
}

impl HttpResponse {
    /// The status code as a number.
    #[must_use]
    pub fn status(&self) -> u16 {
        self.status_code.parse().unwrap_or_default()
    }

    /// Whether the status code is 2xx.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status())
    }

    /// Look up a header by ASCII case-insensitive name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// Look up a header by ASCII case-insensitive name.
pub(crate) fn find_header<'a>(headers: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// Whether a comma-separated header value lists `token`.
pub(crate) fn lists_token(value: &str, token: &str) -> bool {
    value
        .split(',')
        .any(|item| item.trim().eq_ignore_ascii_case(token))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_line_parser_handles_http_11() {
        let parsed = StatusLine::parse("HTTP/1.1 200 OK").unwrap();
        assert_eq!(parsed.version, HttpVersion::HTTP_11);
        assert_eq!(parsed.status_code, "200");
        assert_eq!(parsed.reason, "OK");
        assert_eq!(parsed.code(), 200);
    }

    #[test]
    fn test_status_line_keeps_multiword_reason() {
        let parsed = StatusLine::parse("HTTP/1.0 404 Not Found").unwrap();
        assert_eq!(parsed.version, HttpVersion::HTTP_10);
        assert_eq!(parsed.reason, "Not Found");
    }

    #[test]
    fn test_status_line_allows_empty_reason() {
        assert_eq!(StatusLine::parse("HTTP/1.1 204 ").unwrap().reason, "");
        assert_eq!(StatusLine::parse("HTTP/1.1 204").unwrap().reason, "");
    }

    #[test]
    fn test_status_line_rejects_garbage() {
        for line in ["", "HTTP/1.1", "HTTP/11 200 OK", "HTTP/1.1 20 OK", "HTTP/1.1 2x0 OK", "ICY 200 OK"] {
            assert!(
                matches!(StatusLine::parse(line), Err(HttpError::InvalidStatusLine { .. })),
                "{line:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_detects_bodyless_status_codes() {
        assert!(status_disallows_body(101));
        assert!(status_disallows_body(204));
        assert!(status_disallows_body(304));
        assert!(!status_disallows_body(200));
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let mut headers = HashMap::new();
        let _ = headers.insert("Transfer-Encoding".to_string(), "gzip, Chunked".to_string());
        assert_eq!(find_header(&headers, "transfer-encoding"), Some("gzip, Chunked"));
        assert!(lists_token("gzip, Chunked", "chunked"));
        assert!(!lists_token("gzip, Chunked", "deflate"));
    }
}
