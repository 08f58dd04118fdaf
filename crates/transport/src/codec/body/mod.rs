//! HTTP payload handling
//!
//! # Components
//!
//! ## Decoders (response payloads)
//! - [`PayloadDecoder`]: selects the strategy from the response head
//!   - chunked transfer coding
//!   - fixed `Content-Length`
//!   - until the connection closes
//!
//! ## Encoders (request uploads)
//! - [`PayloadEncoder`]: selects the strategy from the upload size hint
//!   - fixed `Content-Length` when the size is known
//!   - chunked transfer coding otherwise

mod chunked_decoder;
mod chunked_encoder;
mod length_decoder;
mod length_encoder;
mod payload_decoder;
mod payload_encoder;

pub use payload_decoder::PayloadDecoder;
pub use payload_encoder::PayloadEncoder;
