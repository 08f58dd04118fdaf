//! Pluggable execution backends.
//!
//! A [`Backend`] performs one HTTP exchange described by an [`Exchange`]: it
//! sends the request with the configured method, header lines and optional
//! upload, writes the response header block into `header_sink` and the
//! response body into `body_sink`, and fills in [`TransportInfo`].
//!
//! Backends never decide whether an exchange succeeded. They report the status
//! code through [`TransportInfo::set_http_status_code`] and leave the 2xx check
//! to the [`Transporter`](crate::transport::Transporter). An `Err` means no
//! complete HTTP exchange took place (dns failure, refused connection, broken
//! response).
//!
//! # Backends
//!
//! - [`WireBackend`]: blocking HTTP/1.1 over `std::net::TcpStream`, built on this
//!   crate's codec
//! - `UreqBackend` (feature `ureq`): delegates to the `ureq` client
//! - [`RecordingBackend`]: replays a scripted reply and records every exchange,
//!   for tests

use std::fmt;
use std::io::{Read, Write};
use std::time::Duration;

use http::Uri;

use crate::protocol::{BackendError, MethodPlan, TransportInfo};

mod recording;
mod wire;

#[cfg(feature = "ureq")]
mod agent;

pub use recording::{RecordedExchange, RecordingBackend, Reply};
pub use wire::WireBackend;

#[cfg(feature = "ureq")]
pub use agent::UreqBackend;

pub trait Backend {
    /// Appended to the configured base product token of the `User-Agent` header.
    fn user_agent_suffix(&self) -> &str;

    /// Executes one exchange.
    ///
    /// `info` arrives pre-filled with status `0` and the request uri as effective
    /// url, and must be completed as far as the exchange got, also on error.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if no complete HTTP exchange took place.
    fn execute(&self, exchange: &mut Exchange<'_>, info: &mut TransportInfo) -> Result<(), BackendError>;
}

impl<B: Backend + ?Sized> Backend for &B {
    fn user_agent_suffix(&self) -> &str {
        (**self).user_agent_suffix()
    }

    fn execute(&self, exchange: &mut Exchange<'_>, info: &mut TransportInfo) -> Result<(), BackendError> {
        (**self).execute(exchange, info)
    }
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn user_agent_suffix(&self) -> &str {
        (**self).user_agent_suffix()
    }

    fn execute(&self, exchange: &mut Exchange<'_>, info: &mut TransportInfo) -> Result<(), BackendError> {
        (**self).execute(exchange, info)
    }
}

/// Everything a backend needs to run one request.
pub struct Exchange<'a> {
    pub uri: &'a Uri,
    pub plan: &'a MethodPlan,
    /// Caller header lines in `Name: Value` form.
    pub header_lines: &'a [String],
    /// Present only when the method sends a body and the caller supplied one.
    pub upload: Option<Upload<'a>>,
    pub user_agent: &'a str,
    /// Bounds connection establishment only.
    pub connect_timeout: Duration,
    /// Whether the status line is written into `header_sink`.
    pub include_status_line: bool,
    pub body_sink: &'a mut dyn Write,
    pub header_sink: &'a mut dyn Write,
}

impl fmt::Debug for Exchange<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Exchange")
            .field("uri", self.uri)
            .field("plan", self.plan)
            .field("header_lines", &self.header_lines)
            .field("upload", &self.upload)
            .field("user_agent", &self.user_agent)
            .field("connect_timeout", &self.connect_timeout)
            .field("include_status_line", &self.include_status_line)
            .finish_non_exhaustive()
    }
}

/// Request body source.
pub struct Upload<'a> {
    pub reader: &'a mut dyn Read,
    /// Exact upload size when the caller declared one with `Content-Length`.
    pub size_hint: Option<u64>,
}

impl fmt::Debug for Upload<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Upload").field("size_hint", &self.size_hint).finish_non_exhaustive()
    }
}
