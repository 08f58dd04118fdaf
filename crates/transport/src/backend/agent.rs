//! Backend delegating the exchange to the `ureq` HTTP client.
//!
//! Redirects are not followed and non-2xx statuses are returned as regular
//! responses, the transporter classifies them.
//!
//! `ureq` does not expose the reason phrase the server sent, so the status line
//! written to the header block carries the canonical reason for the code. A
//! server answering `200 Fine` shows up as `HTTP/1.1 200 OK` here, unlike with
//! the wire backend.

use std::io::{self, Write};

use http::{HeaderValue, Request, header};
use tracing::{debug, trace};
use ureq::{Agent, ResponseExt, SendBody};

use crate::backend::{Backend, Exchange};
use crate::codec::HeaderCodec;
use crate::protocol::{BackendError, TransportInfo, info_keys};

pub const USER_AGENT_SUFFIX: &str = " ureq/3";

#[derive(Debug, Clone, Copy, Default)]
pub struct UreqBackend;

impl UreqBackend {
    pub fn new() -> Self {
        Self
    }

    fn agent(exchange: &Exchange<'_>) -> Agent {
        Agent::config_builder()
            .timeout_connect(Some(exchange.connect_timeout).filter(|timeout| !timeout.is_zero()))
            .http_status_as_error(false)
            .max_redirects(0)
            .allow_non_standard_methods(true)
            .build()
            .new_agent()
    }
}

impl Backend for UreqBackend {
    fn user_agent_suffix(&self) -> &str {
        USER_AGENT_SUFFIX
    }

    fn execute(&self, exchange: &mut Exchange<'_>, info: &mut TransportInfo) -> Result<(), BackendError> {
        let agent = Self::agent(exchange);

        let mut builder = Request::builder().method(exchange.plan.method()).uri(exchange.uri.clone());
        for line in exchange.header_lines {
            let Some((name, value)) = HeaderCodec::split_line(line) else {
                return Err(BackendError::client(format!("invalid header line: {line}")));
            };
            if name.eq_ignore_ascii_case(header::CONTENT_LENGTH.as_str()) || name.eq_ignore_ascii_case(header::TRANSFER_ENCODING.as_str()) {
                continue;
            }
            builder = builder.header(name, value);
        }
        if HeaderCodec::find(exchange.header_lines, header::USER_AGENT.as_str()).is_none() {
            builder = builder.header(header::USER_AGENT, exchange.user_agent);
        }

        let result = match exchange.upload.as_mut() {
            Some(upload) => {
                if let Some(size) = upload.size_hint {
                    builder = builder.header(header::CONTENT_LENGTH, HeaderValue::from(size));
                }
                let request = builder.body(SendBody::from_reader(&mut *upload.reader)).map_err(BackendError::client)?;
                agent.run(request)
            }
            None => {
                let request = builder.body(()).map_err(BackendError::client)?;
                agent.run(request)
            }
        };

        let mut response = result.map_err(|e| {
            debug!(uri = %exchange.uri, cause = %e, "ureq exchange failed");
            match e {
                ureq::Error::Io(source) => BackendError::Io { source },
                e => BackendError::client(e),
            }
        })?;

        let status = response.status();
        info.set_http_status_code(status.as_u16());
        info.set_effective_url(response.get_uri().to_string());
        trace!(status = status.as_u16(), "received response head");

        let mut header_size = 0;
        if exchange.include_status_line {
            let line = format!("{:?} {} {}\r\n", response.version(), status.as_u16(), status.canonical_reason().unwrap_or(""));
            exchange.header_sink.write_all(line.as_bytes())?;
            header_size += line.len();
        }
        for (name, value) in response.headers() {
            let line = format!("{}: {}\r\n", name, String::from_utf8_lossy(value.as_bytes()));
            exchange.header_sink.write_all(line.as_bytes())?;
            header_size += line.len();
        }
        info.insert(info_keys::HEADER_SIZE, header_size);

        if let Some(content_type) = response.headers().get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()) {
            info.insert(info_keys::CONTENT_TYPE, content_type);
        }

        if exchange.plan.reads_body() {
            let mut reader = response.body_mut().as_reader();
            let downloaded = io::copy(&mut reader, &mut *exchange.body_sink)?;
            info.insert(info_keys::SIZE_DOWNLOAD, downloaded);
        }

        Ok(())
    }
}
