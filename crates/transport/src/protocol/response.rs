//! The backend agnostic result of a successful exchange.

use std::io::{self, Read};

use http::StatusCode;

use crate::buffer::StreamBuffer;
use crate::codec::HeaderCodec;
use crate::protocol::TransportInfo;

/// A 2xx response.
///
/// The body is a [`StreamBuffer`] positioned at its start. It is released when
/// the `Response` is dropped, or when the buffer taken out with
/// [`Response::into_body`] is dropped.
#[derive(Debug)]
pub struct Response {
    status_code: u16,
    method: String,
    header_lines: Vec<String>,
    body: StreamBuffer,
    info: TransportInfo,
}

impl Response {
    pub(crate) fn new(
        status_code: u16,
        method: String,
        header_lines: Vec<String>,
        body: StreamBuffer,
        info: TransportInfo,
    ) -> Self {
        Self { status_code, method, header_lines, body, info }
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn status(&self) -> Option<StatusCode> {
        StatusCode::from_u16(self.status_code).ok()
    }

    /// Reason phrase of the status line if the backend captured one, else the
    /// canonical reason for the status code.
    pub fn status_text(&self) -> &str {
        self.header_lines
            .iter()
            .find(|line| HeaderCodec::is_status_line(line))
            .and_then(|line| line.splitn(3, ' ').nth(2))
            .or_else(|| self.status().and_then(|status| status.canonical_reason()))
            .unwrap_or("")
    }

    /// Captured header lines in wire order, including the status line if any.
    pub fn header_lines(&self) -> &[String] {
        &self.header_lines
    }

    /// Value of the first header named `name`, ignoring ASCII case.
    pub fn header(&self, name: &str) -> Option<&str> {
        HeaderCodec::find(&self.header_lines, name)
    }

    /// All `Name: Value` headers in wire order, status lines skipped.
    pub fn headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.header_lines.iter().filter_map(|line| HeaderCodec::split_line(line))
    }

    pub fn content_length(&self) -> Option<u64> {
        self.header(http::header::CONTENT_LENGTH.as_str()).and_then(|value| value.parse().ok())
    }

    /// The method the request was sent with.
    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn effective_url(&self) -> &str {
        self.info.effective_url()
    }

    pub fn info(&self) -> &TransportInfo {
        &self.info
    }

    pub fn body_mut(&mut self) -> &mut StreamBuffer {
        &mut self.body
    }

    pub fn into_body(self) -> StreamBuffer {
        self.body
    }

    /// Reads the rest of the body into memory.
    ///
    /// # Errors
    ///
    /// Returns an error if the body buffer can't be read.
    pub fn bytes(&mut self) -> io::Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.body.read_to_end(&mut bytes)?;
        Ok(bytes)
    }

    /// Reads the rest of the body as utf-8 text.
    ///
    /// # Errors
    ///
    /// Returns an error if the body can't be read or isn't valid utf-8.
    pub fn text(&mut self) -> io::Result<String> {
        let mut text = String::new();
        self.body.read_to_string(&mut text)?;
        Ok(text)
    }
}

impl Read for Response {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.body.read(buf)
    }
}
