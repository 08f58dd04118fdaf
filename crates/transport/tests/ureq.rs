//! Ureq backend against a local blocking server.

#![cfg(feature = "ureq")]

mod common;

use common::serve;
use micro_transport::backend::UreqBackend;
use micro_transport::protocol::{Headers, info_keys};
use micro_transport::{Transport, TransportConfig, Transporter};

fn transporter() -> Transporter<UreqBackend> {
    Transporter::new(UreqBackend::new())
}

#[test]
fn get_body() {
    let server = serve("HTTP/1.1 200 OK\r\nContent-Length: 11\r\nContent-Type: text/plain\r\n\r\nhello world");

    let mut response = transporter().get(&server.uri("/v1/AUTH_test/c/o")).unwrap();

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.header_lines()[0], "HTTP/1.1 200 OK");
    assert_eq!(response.header("content-type"), Some("text/plain"));
    assert_eq!(response.text().unwrap(), "hello world");
    assert_eq!(response.info().get(info_keys::SIZE_DOWNLOAD), Some("11"));

    let request = server.request().to_ascii_lowercase();
    assert!(request.starts_with("get /v1/auth_test/c/o http/1.1\r\n"));
    assert!(request.contains("\r\nuser-agent: micro-transport/"));
    assert!(request.contains(" ureq/3\r\n"));
}

#[test]
fn canonical_reason_in_status_line() {
    let server = serve("HTTP/1.1 200 Fine\r\nContent-Length: 0\r\n\r\n");

    let response = transporter().get(&server.uri("/c/o")).unwrap();
    assert_eq!(response.header_lines()[0], "HTTP/1.1 200 OK");
    assert_eq!(response.status_text(), "OK");
    server.request();
}

#[test]
fn head_reads_no_body() {
    let server = serve("HTTP/1.1 200 OK\r\nContent-Length: 1024\r\n\r\n");

    let mut response = transporter().head(&server.uri("/c/o")).unwrap();
    assert_eq!(response.content_length(), Some(1024));
    assert!(micro_transport::Response::bytes(&mut response).unwrap().is_empty());
    assert!(server.request().starts_with("HEAD /c/o HTTP/1.1\r\n"));
}

#[test]
fn not_found() {
    let server = serve("HTTP/1.1 404 Not Found\r\nContent-Length: 9\r\n\r\nNot Found");

    let failure = transporter().get(&server.uri("/c/missing")).unwrap_err().into_failure().unwrap();
    assert_eq!(failure.status_code(), 404);
    assert_eq!(failure.message(), "HTTP/1.1 404 Not Found");
    assert!(failure.backend_error().is_none());
    server.request();
}

#[test]
fn redirect_is_not_followed() {
    let server = serve("HTTP/1.1 301 Moved Permanently\r\nLocation: /elsewhere\r\nContent-Length: 0\r\n\r\n");

    let failure = transporter().get(&server.uri("/c/o")).unwrap_err().into_failure().unwrap();
    assert_eq!(failure.status_code(), 301);
    assert_eq!(failure.message(), "HTTP/1.1 301 Moved Permanently");
    server.request();
}

#[test]
fn put_with_content_length() {
    let server = serve("HTTP/1.1 201 Created\r\nContent-Length: 0\r\n\r\n");
    let headers = Headers::from([("Content-Length", "11"), ("X-Object-Meta-Color", "blue")]);

    let response = transporter().put(&server.uri("/c/o"), &headers, b"hello world").unwrap();
    assert_eq!(response.status_code(), 201);

    let request = server.request();
    let lowercase = request.to_ascii_lowercase();
    assert!(lowercase.starts_with("put /c/o http/1.1\r\n"));
    assert!(lowercase.contains("\r\ncontent-length: 11\r\n"));
    assert!(!lowercase.contains("transfer-encoding"));
    assert!(lowercase.contains("\r\nx-object-meta-color: blue\r\n"));
    assert!(request.ends_with("\r\n\r\nhello world"));
}

#[test]
fn header_block_without_status_line() {
    let server = serve("HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nok");
    let config = TransportConfig { header_block_includes_status_line: false, ..TransportConfig::default() };

    let mut response = Transporter::with_config(UreqBackend::new(), config).get(&server.uri("/")).unwrap();
    assert_eq!(response.header_lines(), ["content-length: 2"]);
    assert_eq!(response.status_text(), "OK");
    assert_eq!(response.text().unwrap(), "ok");
    server.request();
}
