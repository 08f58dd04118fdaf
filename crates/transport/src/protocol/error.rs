use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::protocol::TransportInfo;

/// Errors returned by [`Transport`](crate::transport::Transport) calls.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error(transparent)]
    Failure(#[from] Failure),

    #[error("can't open resource {}: {source}", path.display())]
    Resource { path: PathBuf, source: io::Error },

    #[error("invalid uri `{uri}`: {reason}")]
    InvalidUri { uri: String, reason: String },

    #[error("invalid http method `{method}`")]
    InvalidMethod { method: String },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl TransportError {
    pub fn invalid_uri<U: ToString, S: ToString>(uri: U, reason: S) -> Self {
        Self::InvalidUri { uri: uri.to_string(), reason: reason.to_string() }
    }

    pub fn invalid_method<S: ToString>(method: S) -> Self {
        Self::InvalidMethod { method: method.to_string() }
    }

    pub fn resource<P: Into<PathBuf>>(path: P, source: io::Error) -> Self {
        Self::Resource { path: path.into(), source }
    }

    /// Returns the transport failure if the exchange ended with one.
    pub fn as_failure(&self) -> Option<&Failure> {
        match self {
            TransportError::Failure(failure) => Some(failure),
            _ => None,
        }
    }

    /// Consumes the error and returns the transport failure if the exchange ended with one.
    pub fn into_failure(self) -> Option<Failure> {
        match self {
            TransportError::Failure(failure) => Some(failure),
            _ => None,
        }
    }
}

/// A request that did not end with a 2xx status.
///
/// Raised for every non-2xx status and for exchanges where the backend could not
/// produce a result at all (dns failure, refused connection). In the latter case
/// `status_code` is whatever the backend reported, usually `0`.
#[derive(Debug, Error)]
#[error("{method} {url} failed ({status_code}): {message}")]
pub struct Failure {
    status_code: u16,
    message: String,
    url: String,
    method: String,
    info: TransportInfo,
    #[source]
    source: Option<BackendError>,
}

impl Failure {
    pub(crate) fn new(
        status_code: u16,
        message: String,
        url: String,
        method: String,
        info: TransportInfo,
        source: Option<BackendError>,
    ) -> Self {
        Self { status_code, message, url, method, info, source }
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// The status line of the failed response, or a synthesized message when no
    /// header was captured.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn info(&self) -> &TransportInfo {
        &self.info
    }

    /// The backend error behind this failure, if the exchange didn't complete.
    pub fn backend_error(&self) -> Option<&BackendError> {
        self.source.as_ref()
    }
}

/// Errors raised by a [`Backend`](crate::backend::Backend) while executing an exchange.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("unsupported uri scheme: {scheme}")]
    UnsupportedScheme { scheme: String },

    #[error("uri has no host")]
    MissingHost,

    #[error("can't resolve {host}: {source}")]
    Resolve { host: String, source: io::Error },

    #[error("can't connect to {host}: {source}")]
    Connect { host: String, source: io::Error },

    #[error("response error: {source}")]
    Parse {
        #[from]
        source: ParseError,
    },

    #[error("request error: {source}")]
    Send {
        #[from]
        source: SendError,
    },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    #[error("http client error: {source}")]
    Client { source: Box<dyn Error + Send + Sync> },
}

impl BackendError {
    pub fn unsupported_scheme<S: ToString>(scheme: S) -> Self {
        Self::UnsupportedScheme { scheme: scheme.to_string() }
    }

    pub fn client<E: Into<Box<dyn Error + Send + Sync>>>(e: E) -> Self {
        Self::Client { source: e.into() }
    }
}

/// Errors decoding a response received from the wire.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("header size too large, current: {current_size} exceed the limit {max_size}")]
    TooLargeHeader { current_size: usize, max_size: usize },

    #[error("header number exceed the limit {max_num}")]
    TooManyHeaders { max_num: usize },

    #[error("invalid header: {reason}")]
    InvalidHeader { reason: String },

    #[error("invalid http version: {0:?}")]
    InvalidVersion(Option<u8>),

    #[error("invalid http status: {0:?}")]
    InvalidStatus(Option<u16>),

    #[error("invalid content-length header: {reason}")]
    InvalidContentLength { reason: String },

    #[error("invalid body: {reason}")]
    InvalidBody { reason: String },

    #[error("connection closed before the response was complete")]
    UnexpectedEof,

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ParseError {
    pub fn too_large_header(current_size: usize, max_size: usize) -> Self {
        Self::TooLargeHeader { current_size, max_size }
    }

    pub fn too_many_headers(max_num: usize) -> Self {
        Self::TooManyHeaders { max_num }
    }

    pub fn invalid_header<S: ToString>(str: S) -> Self {
        Self::InvalidHeader { reason: str.to_string() }
    }

    pub fn invalid_body<S: ToString>(str: S) -> Self {
        Self::InvalidBody { reason: str.to_string() }
    }

    pub fn invalid_content_length<S: ToString>(str: S) -> Self {
        Self::InvalidContentLength { reason: str.to_string() }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}

/// Errors encoding a request onto the wire.
#[derive(Error, Debug)]
pub enum SendError {
    #[error("invalid header line: {line}")]
    InvalidHeaderLine { line: String },

    #[error("invalid body: {reason}")]
    InvalidBody { reason: String },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl SendError {
    pub fn invalid_header_line<S: ToString>(line: S) -> Self {
        Self::InvalidHeaderLine { line: line.to_string() }
    }

    pub fn invalid_body<S: ToString>(str: S) -> Self {
        Self::InvalidBody { reason: str.to_string() }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}

/// Message used when a failure carries no captured header line.
pub(crate) struct UnknownError(pub(crate) u16);

impl fmt::Display for UnknownError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown (non-HTTP) error: {}", self.0)
    }
}
