//! Integration tests for the response parser: framing, errors, and
//! incremental delivery.

use quickcheck_macros::quickcheck;
use rstest::rstest;
use wren_common::Limits;
use wren_http::{
    ChunkFramingError, ChunkedBodyDecoder, HttpError, HttpVersion, ParserState, ResponseParser,
    parse_response,
};

const CHUNKED: &str = "HTTP/1.1 200 OK\r\n\
                       Content-Type: text/html\r\n\
                       Transfer-Encoding: chunked\r\n\
                       \r\n\
                       4\r\nWiki\r\n5\r\npedia\r\n0\r\n\r\n";

#[test]
fn test_chunked_response() {
    let response = parse_response(CHUNKED.as_bytes()).unwrap();
    assert_eq!(response.version, HttpVersion::HTTP_11);
    assert_eq!(response.status_code, "200");
    assert_eq!(response.status(), 200);
    assert!(response.is_success());
    assert_eq!(response.reason, "OK");
    assert_eq!(response.headers["Content-Type"], "text/html");
    assert_eq!(response.header("content-type"), Some("text/html"));
    assert_eq!(response.body.as_deref(), Some("Wikipedia"));
}

#[test]
fn test_header_keys_are_case_sensitive_and_last_write_wins() {
    let raw = "HTTP/1.1 200 OK\r\nX-A: 1\r\nx-a: 2\r\nX-A: 3\r\nContent-Length: 0\r\n\r\n";
    let response = parse_response(raw.as_bytes()).unwrap();
    assert_eq!(response.headers["X-A"], "3");
    assert_eq!(response.headers["x-a"], "2");
}

#[test]
fn test_conflicting_content_lengths_are_rejected() {
    let raw = b"HTTP/1.1 200 OK\r\ncontent-length: 2\r\nContent-Length: 4\r\n\r\nabcd";
    for _ in 0..32 {
        assert_eq!(
            parse_response(raw),
            Err(HttpError::InvalidContentLength {
                value: "2, 4".to_string()
            })
        );
    }
}

#[test]
fn test_repeated_equal_content_lengths_are_accepted() {
    let raw = b"HTTP/1.1 200 OK\r\ncontent-length: 4\r\nContent-Length: 4\r\n\r\nabcd";
    for _ in 0..32 {
        let response = parse_response(raw).unwrap();
        assert_eq!(response.body.as_deref(), Some("abcd"));
    }
}

#[test]
fn test_chunked_in_any_case_variant_wins_over_content_length() {
    let raw = "HTTP/1.1 200 OK\r\nContent-Length: 1\r\ntransfer-encoding: gzip\r\n\
               Transfer-Encoding: chunked\r\n\r\n2\r\nhi\r\n0\r\n\r\n";
    for _ in 0..32 {
        let response = parse_response(raw.as_bytes()).unwrap();
        assert_eq!(response.body.as_deref(), Some("hi"));
    }
}

#[test]
fn test_content_length_body() {
    let raw = "HTTP/1.0 200 OK\r\nContent-Length: 5\r\n\r\nhello";
    let response = parse_response(raw.as_bytes()).unwrap();
    assert_eq!(response.version, HttpVersion::HTTP_10);
    assert_eq!(response.body.as_deref(), Some("hello"));
}

#[test]
fn test_body_until_close() {
    let mut parser = ResponseParser::new();
    parser.receive("HTTP/1.1 200 OK\r\n\r\n<p>streamed</p>").unwrap();
    assert!(!parser.is_finished());
    assert_eq!(parser.response(), Err(HttpError::NotReady));
    parser.finish().unwrap();
    assert_eq!(parser.response().unwrap().body.as_deref(), Some("<p>streamed</p>"));
}

#[test]
fn test_no_body_for_304() {
    let response = parse_response(b"HTTP/1.1 304 Not Modified\r\nETag: \"x\"\r\n\r\n").unwrap();
    assert_eq!(response.body, None);
}

#[test]
fn test_response_not_ready_mid_body() {
    let mut parser = ResponseParser::new();
    parser.receive(&CHUNKED[..CHUNKED.len() - 3]).unwrap();
    assert_eq!(parser.state(), ParserState::Body);
    assert!(!parser.is_finished());
    assert_eq!(parser.response(), Err(HttpError::NotReady));
}

#[rstest]
#[case::missing_version("200 OK\r\n\r\n")]
#[case::short_code("HTTP/1.1 20 OK\r\n\r\n")]
#[case::bare_lf("HTTP/1.1 200 OK\n\r\n")]
#[case::cr_without_lf("HTTP/1.1 200 OK\rX")]
fn test_invalid_status_line(#[case] raw: &str) {
    let err = parse_response(raw.as_bytes()).unwrap_err();
    assert!(matches!(err, HttpError::InvalidStatusLine { .. }), "{err:?}");
}

#[rstest]
#[case::no_colon("HTTP/1.1 200 OK\r\nBroken\r\n\r\n")]
#[case::empty_name("HTTP/1.1 200 OK\r\n: value\r\n\r\n")]
#[case::space_in_name("HTTP/1.1 200 OK\r\nBad Name: v\r\n\r\n")]
#[case::bare_lf("HTTP/1.1 200 OK\r\nA: b\n\r\n")]
fn test_invalid_header_line(#[case] raw: &str) {
    let err = parse_response(raw.as_bytes()).unwrap_err();
    assert!(matches!(err, HttpError::InvalidHeaderLine { .. }), "{err:?}");
}

#[rstest]
#[case("")]
#[case("HTTP/1.1 200 OK")]
#[case("HTTP/1.1 200 OK\r\n")]
#[case("HTTP/1.1 200 OK\r\nContent-Type: text/html\r\n")]
#[case("HTTP/1.1 200 OK\r\nContent-Type: text/html\r\n\r")]
fn test_unterminated_header_block(#[case] raw: &str) {
    let mut parser = ResponseParser::new();
    parser.receive(raw).unwrap();
    assert_eq!(parser.finish(), Err(HttpError::UnterminatedHeaderBlock));
}

#[rstest]
#[case::bad_digit("Z\r\nx\r\n0\r\n\r\n", ChunkFramingError::InvalidSizeDigit('Z'))]
#[case::missing_size("\r\n", ChunkFramingError::MissingSize)]
#[case::overrun("2\r\nabc\r\n0\r\n\r\n", ChunkFramingError::DataOverrun { found: 'c' })]
#[case::missing_lf("2\r\nab\rX", ChunkFramingError::MissingLineFeed { found: 'X' })]
#[case::trailing("0\r\n\r\nextra", ChunkFramingError::TrailingData)]
fn test_chunk_framing_errors(#[case] body: &str, #[case] expected: ChunkFramingError) {
    let raw = format!("HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n{body}");
    let err = parse_response(raw.as_bytes()).unwrap_err();
    // Data after a completed chunked body surfaces from the outer parser.
    if expected == ChunkFramingError::TrailingData {
        assert_eq!(err, HttpError::UnexpectedDataAfterMessage);
    } else {
        assert_eq!(err, HttpError::ChunkFraming(expected));
    }
}

#[test]
fn test_truncated_chunked_body() {
    let raw = "HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n4\r\nWi";
    let err = parse_response(raw.as_bytes()).unwrap_err();
    assert_eq!(err, HttpError::ChunkFraming(ChunkFramingError::Truncated));
}

#[test]
fn test_short_content_length_body() {
    let err = parse_response(b"HTTP/1.1 200 OK\r\nContent-Length: 10\r\n\r\nabc").unwrap_err();
    assert_eq!(
        err,
        HttpError::BodyLengthMismatch {
            expected: 10,
            received: 3
        }
    );
}

#[test]
fn test_invalid_content_length() {
    let err = parse_response(b"HTTP/1.1 200 OK\r\nContent-Length: ten\r\n\r\n").unwrap_err();
    assert!(matches!(err, HttpError::InvalidContentLength { .. }));
}

#[test]
fn test_header_limits() {
    let limits = Limits {
        max_header_line_bytes: 32,
        max_header_count: 2,
        ..Limits::default()
    };

    let mut parser = ResponseParser::with_limits(limits);
    let err = parser
        .receive("HTTP/1.1 200 OK\r\nX-Long: aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa\r\n")
        .unwrap_err();
    assert!(matches!(err, HttpError::HeaderTooLarge { limit: 32, .. }));

    let mut parser = ResponseParser::with_limits(limits);
    let err = parser
        .receive("HTTP/1.1 200 OK\r\nA: 1\r\nB: 2\r\nC: 3\r\n")
        .unwrap_err();
    assert!(matches!(err, HttpError::HeaderTooLarge { limit: 2, .. }));
}

#[test]
fn test_data_after_complete_message() {
    let mut parser = ResponseParser::new();
    parser.receive("HTTP/1.1 200 OK\r\nContent-Length: 1\r\n\r\nx").unwrap();
    assert!(parser.is_finished());
    assert_eq!(parser.receive("y"), Err(HttpError::UnexpectedDataAfterMessage));
}

#[test]
fn test_two_decoders_agree() {
    let input = "4\r\nWiki\r\n5\r\npedia\r\n0\r\n\r\n";
    let mut first = ChunkedBodyDecoder::new();
    let mut second = ChunkedBodyDecoder::new();
    first.receive(input).unwrap();
    second.receive(input).unwrap();
    assert_eq!(first.segments(), second.segments());
    assert_eq!(first.finish(), second.finish());
}

/// Any split of the byte stream into two reads yields the same response as a
/// single read.
#[quickcheck]
fn prop_byte_split_is_invisible(split: usize, body: String) -> bool {
    // An empty first chunk would itself be the last chunk.
    if body.is_empty() {
        return true;
    }
    let raw = format!(
        "HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n{:x}\r\n{body}\r\n0\r\n\r\n",
        body.len()
    );
    let bytes = raw.as_bytes();
    let (head, tail) = bytes.split_at(split % (bytes.len() + 1));

    let mut parser = ResponseParser::new();
    let _ = parser.receive_bytes(head);
    let _ = parser.receive_bytes(tail);
    let split_result = parser.into_response();

    let whole = parse_response(bytes);
    split_result == whole && whole.map(|r| r.body) == Ok(Some(body))
}
