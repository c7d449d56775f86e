//! Tests for response serialization and streaming

use hearth::http::response::{Response, StatusCode};
use hearth::http::writer::ResponseWriter;

// Pinned so the serialized head is byte-for-byte predictable
const FIXED_DATE: &str = "Tue, 01 Jul 2025 12:00:00 GMT";

#[tokio::test]
async fn test_write_head_without_body() {
    let response = Response::not_found().with_header("Date", FIXED_DATE);

    let mut writer = ResponseWriter::new(&response);
    let mut sink: Vec<u8> = Vec::new();
    writer.write_to_stream(&mut sink).await.unwrap();

    let expected = format!("HTTP/1.1 404 Not Found\r\nDate: {FIXED_DATE}\r\n\r\n");
    assert_eq!(String::from_utf8(sink).unwrap(), expected);
}

#[tokio::test]
async fn test_headers_written_in_sorted_order() {
    let response = Response::new(StatusCode::Ok)
        .with_header("Date", FIXED_DATE)
        .with_header("Last-Modified", FIXED_DATE)
        .with_header("Content-Type", "text/html")
        .with_header("Content-Length", "0")
        .with_header("Connection", "close");

    let mut writer = ResponseWriter::new(&response);
    let mut sink: Vec<u8> = Vec::new();
    writer.write_to_stream(&mut sink).await.unwrap();

    let expected = format!(
        "HTTP/1.1 200 OK\r\n\
         Connection: close\r\n\
         Content-Length: 0\r\n\
         Content-Type: text/html\r\n\
         Date: {FIXED_DATE}\r\n\
         Last-Modified: {FIXED_DATE}\r\n\
         \r\n"
    );
    assert_eq!(String::from_utf8(sink).unwrap(), expected);
}

#[tokio::test]
async fn test_write_streams_file_body_after_head() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hello.txt");
    std::fs::write(&path, "hello world").unwrap();

    let response = Response::new(StatusCode::Ok)
        .with_header("Date", FIXED_DATE)
        .with_header("Content-Length", "11")
        .with_file(path);

    let mut writer = ResponseWriter::new(&response);
    let mut sink: Vec<u8> = Vec::new();
    writer.write_to_stream(&mut sink).await.unwrap();

    let text = String::from_utf8(sink).unwrap();
    assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(text.ends_with("\r\n\r\nhello world"));
}

#[tokio::test]
async fn test_write_large_body_round_trips() {
    // Larger than one internal chunk, so the streaming loop runs more
    // than once
    let body = vec![b'x'; 50_000];

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("big.bin");
    std::fs::write(&path, &body).unwrap();

    let response = Response::new(StatusCode::Ok)
        .with_header("Date", FIXED_DATE)
        .with_file(path);

    let mut writer = ResponseWriter::new(&response);
    let mut sink: Vec<u8> = Vec::new();
    writer.write_to_stream(&mut sink).await.unwrap();

    let separator = b"\r\n\r\n";
    let split = sink
        .windows(separator.len())
        .position(|window| window == separator)
        .unwrap();
    assert_eq!(&sink[split + separator.len()..], &body[..]);
}

#[tokio::test]
async fn test_write_fails_when_body_file_is_gone() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vanished.txt");

    let response = Response::new(StatusCode::Ok)
        .with_header("Date", FIXED_DATE)
        .with_file(path);

    let mut writer = ResponseWriter::new(&response);
    let mut sink: Vec<u8> = Vec::new();

    assert!(writer.write_to_stream(&mut sink).await.is_err());
}
