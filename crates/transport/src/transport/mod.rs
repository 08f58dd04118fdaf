//! The caller facing transport contract.
//!
//! [`Transport`] is what object storage clients program against. The shipped
//! implementation is [`Transporter`], which drives any [`Backend`](crate::backend::Backend).

mod resource;
mod transporter;

pub use resource::{ReadSeek, Resource};
pub use transporter::Transporter;

use crate::protocol::{Headers, Response, TransportError};

/// Executes HTTP requests.
///
/// Every call returns a [`Response`] for a 2xx status and
/// [`TransportError::Failure`] for any other status or when no exchange took
/// place. Nothing is retried and redirects are not followed.
pub trait Transport {
    /// Sends `body` as the request payload. An empty body sends none.
    ///
    /// The method name is matched ignoring ASCII case. GET and HEAD never send
    /// a body, even when one is given.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Failure` for a non-2xx status or a failed
    /// exchange, `InvalidUri` and `InvalidMethod` before any I/O, and `Io` if
    /// the local buffers can't be written.
    fn do_request(&self, uri: &str, method: &str, headers: &Headers, body: &[u8]) -> Result<Response, TransportError>;

    /// Like [`do_request`](Transport::do_request), with the payload read from a [`Resource`].
    ///
    /// # Errors
    ///
    /// Same as `do_request`, plus `TransportError::Resource` if a path can't be
    /// opened. Nothing is sent in that case.
    fn do_request_with_resource(
        &self,
        uri: &str,
        method: &str,
        headers: &Headers,
        resource: Resource<'_>,
    ) -> Result<Response, TransportError>;

    fn get(&self, uri: &str) -> Result<Response, TransportError> {
        self.do_request(uri, "GET", &Headers::new(), &[])
    }

    fn head(&self, uri: &str) -> Result<Response, TransportError> {
        self.do_request(uri, "HEAD", &Headers::new(), &[])
    }

    fn delete(&self, uri: &str) -> Result<Response, TransportError> {
        self.do_request(uri, "DELETE", &Headers::new(), &[])
    }

    fn put(&self, uri: &str, headers: &Headers, body: &[u8]) -> Result<Response, TransportError> {
        self.do_request(uri, "PUT", headers, body)
    }
}
