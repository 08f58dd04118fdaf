//! HTTP header processing
//!
//! # Components
//!
//! - [`HeaderCodec`]: line oriented header blocks
//!   - serializes a [`Headers`](crate::protocol::Headers) mapping into `Name: Value` lines
//!   - parses a captured header block back into trimmed, non-empty lines
//!
//! - [`HeaderDecoder`]: decodes a response head from raw bytes
//!   - status line, version and header fields via `httparse`
//!   - selects how the payload is delimited
//!   - enforces header count and size limits
//!
//! - [`HeaderEncoder`]: encodes a request head into raw bytes
//!   - request line plus caller header lines
//!   - framing header matching the payload size

mod header_decoder;
mod header_encoder;
mod header_lines;

pub use header_decoder::HeaderDecoder;
pub use header_encoder::{HeaderEncoder, RequestHead};
pub use header_lines::HeaderCodec;
