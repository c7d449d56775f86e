//! Tests for response construction

use std::path::PathBuf;

use hearth::http::request::RequestBuilder;
use hearth::http::response::{Response, StatusCode};

#[test]
fn test_status_code_values() {
    assert_eq!(StatusCode::Ok.as_u16(), 200);
    assert_eq!(StatusCode::BadRequest.as_u16(), 400);
    assert_eq!(StatusCode::NotFound.as_u16(), 404);

    assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    assert_eq!(StatusCode::BadRequest.reason_phrase(), "Bad Request");
    assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
}

#[test]
fn test_new_response_carries_date_header() {
    let response = Response::new(StatusCode::Ok);

    assert_eq!(response.proto, "HTTP/1.1");
    assert_eq!(response.status, StatusCode::Ok);
    let date = response.headers.get("Date").unwrap();
    // RFC 7231 fixdate, e.g. "Tue, 25 Mar 2025 10:00:00 GMT"
    assert!(date.ends_with(" GMT"));
    assert!(httpdate::parse_http_date(date).is_ok());
}

#[test]
fn test_with_header_replaces_existing_value() {
    let response = Response::new(StatusCode::Ok)
        .with_header("Content-Length", "10")
        .with_header("Content-Length", "20");

    assert_eq!(response.headers.get("Content-Length").unwrap(), "20");
}

#[test]
fn test_with_file_sets_body_path() {
    let response = Response::new(StatusCode::Ok).with_file(PathBuf::from("/srv/www/index.html"));

    assert_eq!(response.file_path, Some(PathBuf::from("/srv/www/index.html")));
}

#[test]
fn test_with_request_echoes_connection_close() {
    let request = RequestBuilder::new().host("example.com").close().build();
    let response = Response::new(StatusCode::Ok).with_request(request);

    assert_eq!(response.headers.get("Connection").unwrap(), "close");
    assert!(response.must_close());
}

#[test]
fn test_with_request_without_close_adds_no_connection_header() {
    let request = RequestBuilder::new().host("example.com").build();
    let response = Response::new(StatusCode::Ok).with_request(request);

    assert!(!response.headers.contains_key("Connection"));
    assert!(!response.must_close());
}

#[test]
fn test_not_found_has_no_body() {
    let response = Response::not_found();

    assert_eq!(response.status, StatusCode::NotFound);
    assert_eq!(response.file_path, None);
    assert!(!response.headers.contains_key("Content-Length"));
}

#[test]
fn test_bad_request_always_closes() {
    let response = Response::bad_request();

    assert_eq!(response.status, StatusCode::BadRequest);
    assert_eq!(response.headers.get("Connection").unwrap(), "close");
    assert!(response.must_close());
}
