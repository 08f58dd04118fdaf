use std::fs::File;
use std::io::{Read, Seek};

use http::{StatusCode, Uri, header};
use tracing::{debug, warn};

use crate::backend::{Backend, Exchange, Upload};
use crate::buffer::StreamBuffer;
use crate::codec::HeaderCodec;
use crate::config::TransportConfig;
use crate::protocol::{Failure, Headers, MethodPlan, Response, TransportError, TransportInfo, UnknownError};
use crate::transport::{Resource, Transport};

/// [`Transport`] implementation driving a [`Backend`].
///
/// Holds only configuration and the backend, so it can be shared across
/// threads whenever the backend can.
#[derive(Debug, Clone)]
pub struct Transporter<B> {
    backend: B,
    config: TransportConfig,
}

impl<B: Backend> Transporter<B> {
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, TransportConfig::default())
    }

    pub fn with_config(backend: B, config: TransportConfig) -> Self {
        Self { backend, config }
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The `User-Agent` sent with every request.
    pub fn user_agent(&self) -> String {
        self.config.user_agent_for(self.backend.user_agent_suffix())
    }

    fn execute(&self, uri: &str, method: &str, headers: &Headers, upload: Option<&mut dyn Read>) -> Result<Response, TransportError> {
        let parsed: Uri = uri.parse().map_err(|e| TransportError::invalid_uri(uri, e))?;
        if parsed.scheme().is_none() || parsed.host().is_none() {
            return Err(TransportError::invalid_uri(uri, "uri must be absolute"));
        }

        let plan = MethodPlan::dispatch(method)?;
        let header_lines = HeaderCodec::serialize(headers);
        let upload = match upload {
            Some(reader) if plan.sends_body() => Some(Upload { reader, size_hint: size_hint(headers) }),
            _ => None,
        };

        let mut body = StreamBuffer::with_spill_threshold(self.config.spill_threshold);
        let mut header_block = StreamBuffer::with_spill_threshold(self.config.spill_threshold);
        let mut info = TransportInfo::new(uri);
        let user_agent = self.user_agent();

        debug!(method = %plan, uri, upload = upload.is_some(), "execute request");

        let result = {
            let mut exchange = Exchange {
                uri: &parsed,
                plan: &plan,
                header_lines: &header_lines,
                upload,
                user_agent: &user_agent,
                connect_timeout: self.config.connect_timeout(),
                include_status_line: self.config.header_block_includes_status_line,
                body_sink: &mut body,
                header_sink: &mut header_block,
            };
            self.backend.execute(&mut exchange, &mut info)
        };

        header_block.rewind()?;
        let response_lines = HeaderCodec::parse(&mut header_block)?;
        let status_code = info.http_status_code();

        match result {
            Ok(()) if (200..=299).contains(&status_code) => {
                body.rewind()?;
                debug!(method = %plan, uri, status_code, "request succeeded");
                Ok(Response::new(status_code, plan.to_string(), response_lines, body, info))
            }
            result => {
                let source = result.err();
                let message = failure_message(status_code, response_lines);
                warn!(method = %plan, uri, status_code, message = %message, "request failed");
                Err(Failure::new(status_code, message, uri.to_string(), plan.to_string(), info, source).into())
            }
        }
    }
}

impl<B: Backend> Transport for Transporter<B> {
    fn do_request(&self, uri: &str, method: &str, headers: &Headers, body: &[u8]) -> Result<Response, TransportError> {
        if body.is_empty() || !MethodPlan::dispatch(method)?.sends_body() {
            return self.execute(uri, method, headers, None);
        }

        let mut upload = StreamBuffer::from_bytes(body, self.config.spill_threshold)?;
        self.execute(uri, method, headers, Some(&mut upload))
    }

    fn do_request_with_resource(
        &self,
        uri: &str,
        method: &str,
        headers: &Headers,
        resource: Resource<'_>,
    ) -> Result<Response, TransportError> {
        match resource {
            Resource::Path(path) => {
                let mut file = File::open(path).map_err(|e| TransportError::resource(path, e))?;
                self.execute(uri, method, headers, Some(&mut file))
            }
            Resource::Stream(mut stream) => self.execute(uri, method, headers, Some(&mut stream)),
        }
    }
}

/// The caller's `Content-Length`, if it parses.
fn size_hint(headers: &Headers) -> Option<u64> {
    headers.get(header::CONTENT_LENGTH.as_str()).and_then(|value| value.trim().parse().ok())
}

/// The status line of the captured head, or a line built from the status code.
fn failure_message(status_code: u16, response_lines: Vec<String>) -> String {
    if let Some(line) = response_lines.into_iter().next().filter(|line| HeaderCodec::is_status_line(line)) {
        return line;
    }

    match StatusCode::from_u16(status_code) {
        Ok(status) => match status.canonical_reason() {
            Some(reason) => format!("{status_code} {reason}"),
            None => status_code.to_string(),
        },
        Err(_) => UnknownError(status_code).to_string(),
    }
}
