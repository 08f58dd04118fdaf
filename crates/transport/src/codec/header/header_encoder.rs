//! HTTP request head encoder
//!
//! Writes the request line and the caller's `Name: Value` header lines, then
//! appends the framing header matching the payload size. Framing headers
//! supplied by the caller (`Content-Length`, `Transfer-Encoding`) are replaced
//! by the encoder's own so the head always agrees with the bytes that follow.

use std::io::{self, Write};

use bytes::{BufMut, BytesMut};
use http::{Method, header};
use tokio_util::codec::Encoder;
use tracing::trace;

use crate::codec::HeaderCodec;
use crate::protocol::{PayloadSize, SendError};
use crate::utils::ensure;

/// Initial buffer size allocated for head serialization
const INIT_HEADER_SIZE: usize = 4 * 1024;

/// Head of an outgoing request.
#[derive(Debug, Clone)]
pub struct RequestHead {
    pub method: Method,
    /// origin-form request target, e.g. `/v1/container/object?format=json`
    pub target: String,
    /// header lines in `Name: Value` form
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderEncoder;

impl Encoder<(RequestHead, PayloadSize)> for HeaderEncoder {
    type Error = SendError;

    /// # Errors
    ///
    /// Returns `SendError::InvalidHeaderLine` if a line isn't a `Name: Value`
    /// pair or contains a line break.
    fn encode(&mut self, item: (RequestHead, PayloadSize), dst: &mut BytesMut) -> Result<(), Self::Error> {
        let (head, payload_size) = item;

        dst.reserve(INIT_HEADER_SIZE);
        write!(FastWrite(dst), "{} {} HTTP/1.1\r\n", head.method, head.target)?;

        for line in &head.lines {
            ensure!(!line.contains(['\r', '\n']), SendError::invalid_header_line(line));
            let Some((name, _)) = HeaderCodec::split_line(line) else {
                return Err(SendError::invalid_header_line(line));
            };

            if is_framing_header(name) {
                trace!(line = %line, "replace caller framing header");
                continue;
            }

            dst.put_slice(line.as_bytes());
            dst.put_slice(b"\r\n");
        }

        match payload_size {
            PayloadSize::Length(n) => write!(FastWrite(dst), "content-length: {n}\r\n")?,
            PayloadSize::Chunked => dst.put_slice(b"transfer-encoding: chunked\r\n"),
            PayloadSize::Empty | PayloadSize::UntilClose => {}
        }

        dst.put_slice(b"\r\n");
        Ok(())
    }
}

/// Writer over `BytesMut` for `write!`, space is reserved up front.
struct FastWrite<'a>(&'a mut BytesMut);

impl io::Write for FastWrite<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn is_framing_header(name: &str) -> bool {
    name.eq_ignore_ascii_case(header::CONTENT_LENGTH.as_str()) || name.eq_ignore_ascii_case(header::TRANSFER_ENCODING.as_str())
}
