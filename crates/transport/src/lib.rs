//! A pluggable, blocking HTTP transport for object storage style APIs
//!
//! This crate provides a uniform way to issue HTTP requests (GET, HEAD, PUT,
//! POST, DELETE, COPY and custom verbs) with interchangeable execution
//! backends. The caller always gets the same result shape: a [`Response`] with
//! the captured header lines and a rewound body buffer for 2xx statuses, and a
//! typed [`Failure`](protocol::Failure) for everything else.
//!
//! # Features
//!
//! - One [`Transport`] contract, several [`Backend`](backend::Backend)s
//! - Built-in HTTP/1.1 wire backend on `std::net::TcpStream`
//! - `ureq` backed transport behind the `ureq` feature
//! - Request bodies from bytes, files or caller owned streams
//! - Response bodies buffered in memory, spilled to a temporary file when large
//! - Content-length, chunked and close-delimited response bodies
//!
//! # Example
//!
//! ```no_run
//! use std::io::Read;
//! use micro_transport::backend::WireBackend;
//! use micro_transport::protocol::Headers;
//! use micro_transport::{Transport, Transporter};
//!
//! let transporter = Transporter::new(WireBackend::new());
//!
//! let headers = Headers::from([("X-Auth-Token", "AUTH_tk0123"), ("Content-Type", "text/plain")]);
//! transporter.do_request("http://127.0.0.1:8080/v1/AUTH_test/c/hello.txt", "PUT", &headers, b"hello world")?;
//!
//! let mut response = transporter.get("http://127.0.0.1:8080/v1/AUTH_test/c/hello.txt")?;
//! let mut body = String::new();
//! response.read_to_string(&mut body)?;
//! assert_eq!(body, "hello world");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Architecture
//!
//! The crate is organized into several key modules:
//!
//! - [`transport`]: the caller facing [`Transport`] trait and the [`Transporter`]
//! - [`backend`]: the [`Backend`](backend::Backend) trait and its implementations
//! - [`protocol`]: request and response types, transport info and errors
//! - [`codec`]: the HTTP/1.1 wire codec used by the wire backend
//! - [`buffer`]: the spilling [`StreamBuffer`] for payloads
//!
//! # Error Handling
//!
//! - [`protocol::TransportError`]: what every transport call returns
//! - [`protocol::Failure`]: non-2xx status or failed exchange
//! - [`protocol::BackendError`]: why a backend couldn't complete an exchange
//! - [`protocol::ParseError`] / [`protocol::SendError`]: wire codec errors
//!
//! # Limitations
//!
//! - Blocking only, one connection per request
//! - No retries, no redirects, no TLS in the wire backend
//! - Maximum response head size: 64KB
//! - Maximum number of response headers: 128

pub mod backend;
pub mod buffer;
pub mod codec;
pub mod config;
pub mod protocol;
pub mod transport;

mod utils;

pub use buffer::StreamBuffer;
pub use config::TransportConfig;
pub use protocol::Response;
pub use transport::{Resource, Transport, Transporter};
