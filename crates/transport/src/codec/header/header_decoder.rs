//! HTTP response head decoder
//!
//! Parses the status line and header fields of a response with `httparse` and
//! decides how the payload that follows is delimited.
//!
//! # Limits
//!
//! - Maximum number of headers: 128
//! - Maximum head size: 64KB
//! - Only HTTP/1.0 and HTTP/1.1
//!
//! # Payload rules
//!
//! Following RFC 9112 section 6.3, in order:
//!
//! 1. responses to HEAD, and 1xx, 204 and 304 responses have no payload
//! 2. `Transfer-Encoding` ending in `chunked` means a chunked payload, any
//!    other transfer coding means the payload runs until the connection closes
//! 3. `Content-Length` gives a fixed length payload
//! 4. otherwise the payload runs until the connection closes

use bytes::BytesMut;
use http::{HeaderName, HeaderValue, Response, StatusCode};
use httparse::{Error, Status};
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::protocol::{ParseError, PayloadSize, ResponseHeader};
use crate::utils::ensure;

/// Maximum number of headers allowed in a response
const MAX_HEADER_NUM: usize = 128;

/// Maximum size in bytes allowed for the entire head section
const MAX_HEADER_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone, Copy)]
pub struct HeaderDecoder {
    /// false when the request was HEAD, the response never has a payload then
    reads_body: bool,
}

impl HeaderDecoder {
    pub fn new(reads_body: bool) -> Self {
        Self { reads_body }
    }
}

impl Decoder for HeaderDecoder {
    type Item = (ResponseHeader, PayloadSize);
    type Error = ParseError;

    /// # Returns
    ///
    /// - `Ok(Some((header, payload_size)))` if a complete head was parsed
    /// - `Ok(None)` if more data is needed
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the head is malformed, too large, has too many
    /// headers, or declares an unsupported version.
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.is_empty() {
            return Ok(None);
        }

        let mut headers = [httparse::EMPTY_HEADER; MAX_HEADER_NUM];
        let mut resp = httparse::Response::new(&mut headers);

        let parsed_result = resp.parse(src).map_err(|e| match e {
            Error::TooManyHeaders => ParseError::too_many_headers(MAX_HEADER_NUM),
            e => ParseError::invalid_header(e.to_string()),
        });

        match parsed_result? {
            Status::Complete(body_offset) => {
                trace!(head_size = body_offset, "parsed response head");
                ensure!(body_offset <= MAX_HEADER_BYTES, ParseError::too_large_header(body_offset, MAX_HEADER_BYTES));

                let version = match resp.version {
                    Some(0) => http::Version::HTTP_10,
                    Some(1) => http::Version::HTTP_11,
                    v => return Err(ParseError::InvalidVersion(v)),
                };

                let code = resp.code.ok_or(ParseError::InvalidStatus(None))?;
                let status = StatusCode::from_u16(code).map_err(|_e| ParseError::InvalidStatus(Some(code)))?;

                let mut builder = Response::builder().status(status).version(version);
                if let Some(header_map) = builder.headers_mut() {
                    header_map.reserve(resp.headers.len());
                    for header in resp.headers.iter() {
                        let name = HeaderName::from_bytes(header.name.as_bytes()).map_err(ParseError::invalid_header)?;
                        let value = HeaderValue::from_bytes(header.value).map_err(ParseError::invalid_header)?;
                        header_map.append(name, value);
                    }
                }

                let reason = resp.reason.unwrap_or_default().to_owned();
                let inner = builder.body(()).map_err(ParseError::invalid_header)?;

                let raw = src.split_to(body_offset).freeze();
                let header = ResponseHeader::new(inner, reason, raw);
                let payload_size = self.payload_size(&header)?;

                Ok(Some((header, payload_size)))
            }
            Status::Partial => {
                ensure!(src.len() <= MAX_HEADER_BYTES, ParseError::too_large_header(src.len(), MAX_HEADER_BYTES));
                Ok(None)
            }
        }
    }
}

impl HeaderDecoder {
    fn payload_size(&self, header: &ResponseHeader) -> Result<PayloadSize, ParseError> {
        if !self.reads_body || !header.has_body() {
            return Ok(PayloadSize::Empty);
        }

        let te_header = header.headers().get(http::header::TRANSFER_ENCODING);
        let cl_header = header.headers().get(http::header::CONTENT_LENGTH);

        match (te_header, cl_header) {
            (Some(te_value), _) => {
                if is_chunked(te_value) {
                    Ok(PayloadSize::Chunked)
                } else {
                    Ok(PayloadSize::UntilClose)
                }
            }

            (None, Some(cl_value)) => {
                let cl_str = cl_value.to_str().map_err(|_e| ParseError::invalid_content_length("value can't to_str"))?;

                let length = cl_str
                    .trim()
                    .parse::<u64>()
                    .map_err(|_e| ParseError::invalid_content_length(format!("value {cl_str} is not u64")))?;

                Ok(PayloadSize::Length(length))
            }

            (None, None) => Ok(PayloadSize::UntilClose),
        }
    }
}

/// Checks if chunked is the final transfer coding.
fn is_chunked(header_value: &HeaderValue) -> bool {
    const CHUNKED: &[u8] = b"chunked";
    header_value
        .as_bytes()
        .rsplit(|b| *b == b',')
        .next()
        .is_some_and(|coding| coding.trim_ascii().eq_ignore_ascii_case(CHUNKED))
}
