use hyper::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use xhtml_content_type::middleware::{register_content_type_rewrite, ResponseHooks};

/// 주어진 Accept 와 Content-Type 으로 콜백을 등록하고 실행한 뒤 응답 헤더를 반환합니다.
fn negotiate(accept: &[&str], content_type: Option<&'static str>) -> HeaderMap {
    let mut builder = hyper::Request::builder();
    for value in accept {
        builder = builder.header(ACCEPT, *value);
    }
    let req = builder.body(()).unwrap();

    let hooks = ResponseHooks::new();
    register_content_type_rewrite(&req, &hooks);

    let mut headers = HeaderMap::new();
    if let Some(content_type) = content_type {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    }
    assert_eq!(hooks.fire(&mut headers), 1);
    headers
}

#[test]
fn test_xhtml_accepted() {
    let headers = negotiate(&["application/xhtml+xml, text/html"], Some("text/html"));
    assert_eq!(headers[CONTENT_TYPE], "application/xhtml+xml");
}

#[test]
fn test_xml_accepted_keeps_charset() {
    let headers = negotiate(&["application/xml"], Some("text/html; charset=utf-8"));
    assert_eq!(headers[CONTENT_TYPE], "application/xml; charset=utf-8");
}

#[test]
fn test_neither_accepted() {
    let headers = negotiate(&["text/plain"], Some("text/html"));
    assert_eq!(headers[CONTENT_TYPE], "text/html");
}

#[test]
fn test_non_html_response_untouched() {
    let headers = negotiate(&["application/xhtml+xml"], Some("application/json"));
    assert_eq!(headers[CONTENT_TYPE], "application/json");
}

#[test]
fn test_missing_content_type_is_noop() {
    let headers = negotiate(&["application/xhtml+xml"], None);
    assert!(headers.get(CONTENT_TYPE).is_none());
    assert!(headers.is_empty());
}

#[test]
fn test_missing_accept_is_noop() {
    let headers = negotiate(&[], Some("text/html"));
    assert_eq!(headers[CONTENT_TYPE], "text/html");
}

#[test]
fn test_xhtml_wins_in_any_position_and_case() {
    let headers = negotiate(
        &["text/html;q=0.9", "Application/XML", "APPLICATION/XHTML+XML;q=0.1"],
        Some("Text/HTML; charset=ISO-8859-1"),
    );
    assert_eq!(headers[CONTENT_TYPE], "application/xhtml+xml; charset=ISO-8859-1");
}

#[test]
fn test_xml_response_is_never_upgraded() {
    let headers = negotiate(&["application/xhtml+xml"], Some("application/xml"));
    assert_eq!(headers[CONTENT_TYPE], "application/xml");
}

#[test]
fn test_wildcards_do_not_match() {
    let headers = negotiate(&["*/*", "application/*"], Some("text/html"));
    assert_eq!(headers[CONTENT_TYPE], "text/html");
}

#[test]
fn test_running_twice_matches_running_once() {
    let req = hyper::Request::builder()
        .header(ACCEPT, "application/xml")
        .body(())
        .unwrap();

    let first = ResponseHooks::new();
    let second = ResponseHooks::new();
    register_content_type_rewrite(&req, &first);
    register_content_type_rewrite(&req, &second);

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/html; charset=utf-8"));
    first.fire(&mut headers);
    let once = headers[CONTENT_TYPE].clone();
    second.fire(&mut headers);

    assert_eq!(headers[CONTENT_TYPE], once);
    assert_eq!(once, "application/xml; charset=utf-8");
}

#[test]
fn test_registration_does_not_touch_headers() {
    let req = hyper::Request::builder()
        .header(ACCEPT, "application/xhtml+xml")
        .body(())
        .unwrap();

    let hooks = ResponseHooks::new();
    register_content_type_rewrite(&req, &hooks);

    // 아직 실행되지 않았으므로 등록만 된 상태
    assert_eq!(hooks.len(), 1);
    assert!(!hooks.is_started());
    assert!(req.headers().get(CONTENT_TYPE).is_none());
}

#[test]
fn test_spaced_parameters_are_recognized() {
    // `;` 앞의 공백은 허용되며 원래 파라미터는 그대로 남습니다.
    let headers = negotiate(&["application/xhtml+xml ;q=0.9"], Some("text/html ; charset=utf-8"));
    assert_eq!(headers[CONTENT_TYPE], "application/xhtml+xml ; charset=utf-8");

    let headers = negotiate(&["application/xhtml+xml; q=0.9"], Some("text/html; charset=\"utf-8\""));
    assert_eq!(headers[CONTENT_TYPE], "application/xhtml+xml; charset=\"utf-8\"");
}

#[test]
fn test_quoted_comma_in_accept_parameter() {
    let headers = negotiate(&["application/xhtml+xml;x=\"1,2\""], Some("text/html"));
    assert_eq!(headers[CONTENT_TYPE], "application/xhtml+xml");
}
