use std::io::{Cursor, Read, Seek, SeekFrom, Write};
use std::time::Duration;

use http::Method;
use micro_transport::backend::RecordingBackend;
use micro_transport::protocol::{Headers, MethodPlan, TransportError};
use micro_transport::{Resource, Transport, TransportConfig, Transporter};

const OBJECT_URI: &str = "http://127.0.0.1:8080/v1/AUTH_test/c/o";

fn transporter(backend: RecordingBackend) -> Transporter<RecordingBackend> {
    Transporter::new(backend)
}

#[test]
fn no_content_has_empty_body() {
    let transporter = transporter(RecordingBackend::respond(204, ["HTTP/1.1 204 No Content"], ""));

    let mut response = transporter.do_request(OBJECT_URI, "DELETE", &Headers::new(), b"").unwrap();

    assert_eq!(response.status_code(), 204);
    assert_eq!(response.header_lines(), ["HTTP/1.1 204 No Content"]);
    assert_eq!(response.method(), "DELETE");
    let mut body = Vec::new();
    assert_eq!(response.read_to_end(&mut body).unwrap(), 0);
}

#[test]
fn not_found_is_failure() {
    let transporter = transporter(RecordingBackend::respond(404, ["HTTP/1.1 404 Not Found"], "<html>nope</html>"));

    let error = transporter.do_request(OBJECT_URI, "GET", &Headers::new(), b"").unwrap_err();
    let failure = error.into_failure().expect("404 should be a transport failure");

    assert_eq!(failure.status_code(), 404);
    assert_eq!(failure.message(), "HTTP/1.1 404 Not Found");
    assert_eq!(failure.url(), OBJECT_URI);
    assert_eq!(failure.method(), "GET");
    assert_eq!(failure.info().http_status_code(), 404);
    assert!(failure.backend_error().is_none());
    assert_eq!(failure.to_string(), format!("GET {OBJECT_URI} failed (404): HTTP/1.1 404 Not Found"));
}

#[test]
fn unreachable_backend_is_unknown_error() {
    let transporter = transporter(RecordingBackend::unreachable(0));

    let error = transporter.do_request(OBJECT_URI, "HEAD", &Headers::new(), b"").unwrap_err();
    let failure = error.as_failure().expect("failed exchange should be a transport failure");

    assert_eq!(failure.status_code(), 0);
    assert_eq!(failure.message(), "Unknown (non-HTTP) error: 0");
    assert!(failure.backend_error().is_some());
    assert_eq!(failure.info().effective_url(), OBJECT_URI);
}

#[test]
fn redirect_is_failure() {
    let transporter = transporter(RecordingBackend::respond(301, ["HTTP/1.1 301 Moved Permanently", "Location: /elsewhere"], ""));

    let failure = transporter.get(OBJECT_URI).unwrap_err().into_failure().unwrap();
    assert_eq!(failure.status_code(), 301);
    assert_eq!(failure.message(), "HTTP/1.1 301 Moved Permanently");
}

#[test]
fn failure_without_status_line_uses_status_code() {
    let config = TransportConfig { header_block_includes_status_line: false, ..TransportConfig::default() };
    let backend = RecordingBackend::respond(413, ["HTTP/1.1 413 Payload Too Large", "Content-Length: 9"], "too large");
    let transporter = Transporter::with_config(backend, config);

    let failure = transporter.put(OBJECT_URI, &Headers::new(), b"object").unwrap_err().into_failure().unwrap();
    assert_eq!(failure.status_code(), 413);
    assert_eq!(failure.message(), "413 Payload Too Large");
}

#[test]
fn put_without_body() {
    let transporter = transporter(RecordingBackend::respond(201, ["HTTP/1.1 201 Created"], ""));

    let response = transporter.do_request(OBJECT_URI, "PUT", &Headers::new(), b"").unwrap();
    assert_eq!(response.status_code(), 201);

    let exchange = transporter.backend().last_exchange().unwrap();
    assert_eq!(exchange.plan, MethodPlan::Put);
    assert_eq!(exchange.upload, None);
}

#[test]
fn get_never_attaches_body() {
    let transporter = transporter(RecordingBackend::respond(200, ["HTTP/1.1 200 OK"], "data"));

    let mut response = transporter.do_request(OBJECT_URI, "GET", &Headers::new(), b"ignored").unwrap();
    assert_eq!(response.text().unwrap(), "data");

    let exchange = transporter.backend().last_exchange().unwrap();
    assert_eq!(exchange.plan, MethodPlan::Get);
    assert_eq!(exchange.upload, None);
}

#[test]
fn head_reads_no_body() {
    let transporter = transporter(RecordingBackend::respond(200, ["HTTP/1.1 200 OK", "Content-Length: 4"], "data"));

    let mut response = transporter.head(OBJECT_URI).unwrap();
    assert_eq!(response.content_length(), Some(4));
    assert!(micro_transport::Response::bytes(&mut response).unwrap().is_empty());
}

#[test]
fn put_with_body_and_size_hint() {
    let transporter = transporter(RecordingBackend::respond(201, ["HTTP/1.1 201 Created"], ""));
    let headers = Headers::from([("X-Auth-Token", "AUTH_tk"), ("Content-Length", "11")]);

    transporter.put(OBJECT_URI, &headers, b"hello world").unwrap();

    let exchange = transporter.backend().last_exchange().unwrap();
    assert_eq!(exchange.upload.as_deref(), Some(&b"hello world"[..]));
    assert_eq!(exchange.size_hint, Some(11));
    assert_eq!(exchange.header_lines, ["X-Auth-Token: AUTH_tk", "Content-Length: 11"]);
}

#[test]
fn custom_verbs_send_body() {
    let transporter = transporter(RecordingBackend::respond(202, ["HTTP/1.1 202 Accepted"], ""));
    let headers = Headers::from([("Destination", "/c/copy")]);

    transporter.do_request(OBJECT_URI, "copy", &headers, b"payload").unwrap();

    let exchange = transporter.backend().last_exchange().unwrap();
    assert_eq!(exchange.plan, MethodPlan::Custom(Method::from_bytes(b"COPY").unwrap()));
    assert_eq!(exchange.upload.as_deref(), Some(&b"payload"[..]));
    assert_eq!(exchange.size_hint, None);
}

#[test]
fn method_case_is_ignored() {
    let headers = Headers::from([("Accept", "application/json")]);

    let lower = transporter(RecordingBackend::respond(200, ["HTTP/1.1 200 OK"], ""));
    lower.do_request(OBJECT_URI, "get", &headers, b"").unwrap();

    let upper = transporter(RecordingBackend::respond(200, ["HTTP/1.1 200 OK"], ""));
    upper.do_request(OBJECT_URI, "GET", &headers, b"").unwrap();

    assert_eq!(lower.backend().exchanges(), upper.backend().exchanges());
}

#[test]
fn invalid_method_fails_before_io() {
    let transporter = transporter(RecordingBackend::respond(200, ["HTTP/1.1 200 OK"], ""));

    let result = transporter.do_request(OBJECT_URI, "GET /", &Headers::new(), b"");
    assert!(matches!(result, Err(TransportError::InvalidMethod { .. })));
    assert!(transporter.backend().exchanges().is_empty());
}

#[test]
fn resource_from_path() {
    let transporter = transporter(RecordingBackend::respond(201, ["HTTP/1.1 201 Created"], ""));
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"file content").unwrap();

    transporter.do_request_with_resource(OBJECT_URI, "PUT", &Headers::new(), Resource::path(file.path())).unwrap();

    let exchange = transporter.backend().last_exchange().unwrap();
    assert_eq!(exchange.upload.as_deref(), Some(&b"file content"[..]));
}

#[test]
fn resource_stream_is_not_rewound() {
    let transporter = transporter(RecordingBackend::respond(201, ["HTTP/1.1 201 Created"], ""));
    let mut stream = Cursor::new(b"skip:keep".to_vec());
    stream.seek(SeekFrom::Start(5)).unwrap();

    transporter.do_request_with_resource(OBJECT_URI, "PUT", &Headers::new(), Resource::stream(&mut stream)).unwrap();

    let exchange = transporter.backend().last_exchange().unwrap();
    assert_eq!(exchange.upload.as_deref(), Some(&b"keep"[..]));
    assert_eq!(stream.position(), 9);
}

#[test]
fn missing_resource_path() {
    let transporter = transporter(RecordingBackend::respond(201, ["HTTP/1.1 201 Created"], ""));
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.bin");

    let result = transporter.do_request_with_resource(OBJECT_URI, "PUT", &Headers::new(), Resource::path(&missing));

    match result {
        Err(TransportError::Resource { path, .. }) => assert_eq!(path, missing),
        other => panic!("expect resource error, got {other:?}"),
    }
    assert!(transporter.backend().exchanges().is_empty());
}

#[test]
fn configuration_reaches_backend() {
    let config = TransportConfig {
        user_agent: "swift-client/2.1".to_string(),
        user_agent_suffix: Some(" (batch)".to_string()),
        connect_timeout_seconds: 5,
        header_block_includes_status_line: false,
        spill_threshold: 16,
    };
    let backend = RecordingBackend::respond(200, ["HTTP/1.1 200 OK", "Content-Type: text/plain", "", "   "], "a body larger than sixteen bytes");
    let transporter = Transporter::with_config(backend, config);

    let mut response = transporter.get(OBJECT_URI).unwrap();

    assert_eq!(response.header_lines(), ["Content-Type: text/plain"]);
    assert_eq!(response.status_text(), "OK");
    assert_eq!(response.header("content-type"), Some("text/plain"));
    assert!(response.body_mut().is_spilled());
    assert_eq!(response.text().unwrap(), "a body larger than sixteen bytes");

    let exchange = transporter.backend().last_exchange().unwrap();
    assert_eq!(exchange.user_agent, "swift-client/2.1 (batch)");
    assert_eq!(exchange.connect_timeout, Duration::from_secs(5));
    assert!(!exchange.include_status_line);
}
