//! End-to-end tests: response bytes to styled tree.

use anyhow::{Context, Result};
use rstest::rstest;
use wren_common::Limits;
use wren_core::{DocumentSession, LoadError};
use wren_dom::style::Specificity;
use wren_html::HtmlErrorKind;
use wren_http::{ChunkFramingError, HttpError};

const PAGE: &str = concat!(
    "<!DOCTYPE html><html><head><style>",
    "div p { color: red } #intro { color: blue } .note { margin: 0 }",
    "</style></head><body>",
    "<div><p id=\"intro\">a</p><p class=\"note\">b</p></div><p>c</p>",
    "</body></html>",
);

fn chunked(body: &str, piece: usize) -> Vec<u8> {
    let mut raw = String::from("HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n");
    let chars: Vec<char> = body.chars().collect();
    for chunk in chars.chunks(piece) {
        let text: String = chunk.iter().collect();
        raw.push_str(&format!("{:x}\r\n{text}\r\n", text.len()));
    }
    raw.push_str("0\r\n\r\n");
    raw.into_bytes()
}

fn content_length(body: &str) -> Vec<u8> {
    format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\n\r\n{body}",
        body.len()
    )
    .into_bytes()
}

#[test]
fn test_chunked_page_is_styled() -> Result<()> {
    let _ = wren_common::logging::init();
    let session = DocumentSession::new();
    let document = session.load_response(&chunked(PAGE, 16))?;

    let ps = document.elements_by_tag_name("p");
    assert_eq!(ps.len(), 3);
    let intro = document.computed_style(ps[0]).context("intro style")?;
    let note = document.computed_style(ps[1]).context("note style")?;
    let outside = document.computed_style(ps[2]).context("outside style")?;

    assert_eq!(intro.get("color"), Some("blue"));
    assert_eq!(
        intro.declared("color").map(|d| d.specificity),
        Some(Specificity::new(0, 1, 0, 0))
    );
    assert_eq!(note.get("color"), Some("red"));
    assert_eq!(note.get("margin"), Some("0"));
    assert!(outside.is_empty());

    assert_eq!(document.tree().doctype(), Some("html"));
    assert!(session.rules().is_empty());
    Ok(())
}

#[test]
fn test_chunked_and_content_length_agree() -> Result<()> {
    let first = DocumentSession::new().load_response(&chunked(PAGE, 7))?;
    let second = DocumentSession::new().load_response(&content_length(PAGE))?;
    assert_eq!(first.tree().dump(), second.tree().dump());
    assert_eq!(
        first.to_json_value()?["tree"],
        second.to_json_value()?["tree"]
    );
    Ok(())
}

#[test]
fn test_independent_sessions_are_deterministic() -> Result<()> {
    let raw = chunked(PAGE, 5);
    let first = DocumentSession::new().load_response(&raw)?.to_json()?;
    let second = DocumentSession::new().load_response(&raw)?.to_json()?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_json_shape() -> Result<()> {
    let session = DocumentSession::new();
    let raw = content_length("<style>a { color: red }</style><a href=\"/\">x</a>");
    let json = session.load_response(&raw)?.to_json_value()?;

    assert_eq!(json["status_code"], "200");
    assert_eq!(json["reason"], "OK");
    assert_eq!(json["headers"]["Content-Type"], "text/html");
    assert_eq!(json["tree"]["type"], "document");

    let anchor = &json["tree"]["children"][1];
    assert_eq!(anchor["type"], "element");
    assert_eq!(anchor["tag"], "a");
    assert_eq!(anchor["attributes"][0]["name"], "href");
    assert_eq!(anchor["style"]["color"]["value"], "red");
    assert_eq!(anchor["children"][0]["type"], "text");
    assert_eq!(anchor["children"][0]["data"], "x");
    Ok(())
}

#[test]
fn test_preloaded_stylesheet_wins_ties() -> Result<()> {
    let mut session = DocumentSession::new();
    session.collect_css_rules("p { color: green }");
    let document = session.load_html("<style>p { color: red }</style><p>x</p>")?;
    let p = document.elements_by_tag_name("p")[0];
    assert_eq!(
        document.computed_style(p).and_then(|s| s.get("color")),
        Some("green")
    );
    assert!(document.response().is_none());
    Ok(())
}

#[test]
fn test_style_elements_stay_with_their_document() -> Result<()> {
    let mut session = DocumentSession::new();
    session.collect_css_rules("p { margin: 0 }");

    let first = session.load_html("<style>p { color: red }</style><p>a</p>")?;
    let second = session.load_html("<p>b</p>")?;

    let p = first.elements_by_tag_name("p")[0];
    let style = first.computed_style(p).context("first p style")?;
    assert_eq!(style.get("color"), Some("red"));
    assert_eq!(style.get("margin"), Some("0"));

    let p = second.elements_by_tag_name("p")[0];
    let style = second.computed_style(p).context("second p style")?;
    assert_eq!(style.get("color"), None);
    assert_eq!(style.get("margin"), Some("0"));

    assert_eq!(session.rules().len(), 1);
    Ok(())
}

#[test]
fn test_resolve_is_idempotent() -> Result<()> {
    let session = DocumentSession::new();
    let mut tree = session.load_response(&content_length(PAGE))?.into_tree();
    let before = tree.dump();
    let styles_before: Vec<_> = tree
        .elements()
        .into_iter()
        .filter_map(|id| tree.as_element(id).map(|e| e.computed_style.clone()))
        .collect();

    session.resolve(&mut tree);

    let styles_after: Vec<_> = tree
        .elements()
        .into_iter()
        .filter_map(|id| tree.as_element(id).map(|e| e.computed_style.clone()))
        .collect();
    assert_eq!(before, tree.dump());
    assert_eq!(styles_before, styles_after);
    Ok(())
}

#[rstest]
#[case::no_content("HTTP/1.1 204 No Content\r\n\r\n", "204")]
#[case::not_modified("HTTP/1.1 304 Not Modified\r\nContent-Length: 10\r\n\r\n", "304")]
fn test_missing_body(#[case] raw: &str, #[case] status: &str) {
    let err = DocumentSession::new()
        .load_response(raw.as_bytes())
        .unwrap_err();
    assert_eq!(
        err,
        LoadError::MissingBody {
            status: status.to_string()
        }
    );
}

#[test]
fn test_html_errors_surface() {
    let raw = content_length("<a></b>");
    let err = DocumentSession::new().load_response(&raw).unwrap_err();
    match err {
        LoadError::Html(e) => assert!(matches!(e.kind, HtmlErrorKind::TagMismatch { .. })),
        other => panic!("expected an HTML error, got {other:?}"),
    }
}

#[test]
fn test_http_errors_surface() {
    let raw = b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\nZ\r\n";
    let err = DocumentSession::new().load_response(raw).unwrap_err();
    assert_eq!(
        err,
        LoadError::Http(HttpError::ChunkFraming(
            ChunkFramingError::InvalidSizeDigit('Z')
        ))
    );
    assert!(err.to_string().starts_with("http: "));
}

#[test]
fn test_session_limits_reach_every_engine() {
    let limits = Limits {
        max_open_elements: 2,
        ..Limits::default()
    };
    let session = DocumentSession::with_limits(limits);
    assert_eq!(session.limits().max_open_elements, 2);
    let err = session
        .load_response(&content_length("<a><b><c></c></b></a>"))
        .unwrap_err();
    assert!(matches!(
        err,
        LoadError::Html(ref e) if e.kind == HtmlErrorKind::NestingTooDeep { limit: 2 }
    ));
}
