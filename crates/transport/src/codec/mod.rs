//! HTTP/1.1 wire codec used by the wire backend
//!
//! Streaming request encoding and response decoding, built on the
//! `tokio_util::codec` traits and driven synchronously over `BytesMut` buffers.
//!
//! # Architecture
//!
//! - Request handling:
//!   - [`RequestEncoder`]: encodes an outgoing request head and upload
//!   - head encoding via [`HeaderEncoder`]
//!   - upload encoding via the body module, fixed length or chunked
//!
//! - Response handling:
//!   - [`ResponseDecoder`]: decodes an incoming response head and payload
//!   - head parsing via [`HeaderDecoder`]
//!   - payload decoding via the body module
//!
//! - Header blocks:
//!   - [`HeaderCodec`]: converts between header mappings, `Name: Value` lines
//!     and captured header blocks
//!
//! # Example
//!
//! ```
//! use micro_transport::codec::{RequestEncoder, RequestHead, ResponseDecoder};
//! use micro_transport::protocol::{Message, PayloadSize};
//! use tokio_util::codec::{Decoder, Encoder};
//! use bytes::BytesMut;
//!
//! let head = RequestHead { method: http::Method::GET, target: "/".to_string(), lines: vec!["Host: localhost".to_string()] };
//! let mut request = BytesMut::new();
//! RequestEncoder::new().encode(Message::<_, &[u8]>::Header((head, PayloadSize::Empty)), &mut request).unwrap();
//! assert!(request.starts_with(b"GET / HTTP/1.1\r\n"));
//!
//! let mut response = BytesMut::from("HTTP/1.1 204 No Content\r\n\r\n");
//! let message = ResponseDecoder::new(true).decode(&mut response).unwrap();
//! assert!(message.is_some_and(|m| m.is_header()));
//! ```

mod body;
mod header;
mod request_encoder;
mod response_decoder;

pub use body::{PayloadDecoder, PayloadEncoder};
pub use header::{HeaderCodec, HeaderDecoder, HeaderEncoder, RequestHead};
pub use request_encoder::RequestEncoder;
pub use response_decoder::ResponseDecoder;
