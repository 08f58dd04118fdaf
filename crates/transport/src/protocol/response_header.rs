//! Response head as decoded from the wire.
//!
//! Wraps an `http::Response<()>` together with the reason phrase and the raw
//! bytes of the head, so backends can forward the header block exactly as the
//! server sent it.

use bytes::Bytes;
use http::{HeaderMap, Response, StatusCode, Version};

#[derive(Debug)]
pub struct ResponseHeader {
    inner: Response<()>,
    reason: String,
    raw: Bytes,
}

impl ResponseHeader {
    pub fn new(inner: Response<()>, reason: String, raw: Bytes) -> Self {
        Self { inner, reason, raw }
    }

    pub fn status(&self) -> StatusCode {
        self.inner.status()
    }

    pub fn version(&self) -> Version {
        self.inner.version()
    }

    pub fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    /// The reason phrase sent by the server, which may be empty.
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Status line and header lines as received, including the final empty line.
    pub fn raw(&self) -> &Bytes {
        &self.raw
    }

    /// The raw header lines without the leading status line.
    pub fn raw_fields(&self) -> &[u8] {
        match self.raw.iter().position(|b| *b == b'\n') {
            Some(index) => &self.raw[index + 1..],
            None => &[],
        }
    }

    /// Returns false for statuses that never carry a payload (1xx, 204, 304).
    pub fn has_body(&self) -> bool {
        let status = self.status();
        !(status.is_informational() || status == StatusCode::NO_CONTENT || status == StatusCode::NOT_MODIFIED)
    }

    pub fn into_inner(self) -> Response<()> {
        self.inner
    }
}

impl AsRef<Response<()>> for ResponseHeader {
    fn as_ref(&self) -> &Response<()> {
        &self.inner
    }
}
