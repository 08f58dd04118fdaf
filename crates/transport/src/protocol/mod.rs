//! Core protocol types shared by the transporter, the codec and the backends.
//!
//! # Architecture
//!
//! - **Request side**
//!   - [`Headers`]: insertion ordered request header mapping
//!   - [`MethodPlan`]: a method name resolved into backend behavior
//!
//! - **Response side**
//!   - [`Response`]: the result of a 2xx exchange, owning the body buffer
//!   - [`ResponseHeader`]: a response head decoded from the wire
//!   - [`TransportInfo`]: backend reported metadata (status, effective url, extras)
//!
//! - **Wire messages**: [`Message`], [`PayloadItem`], [`PayloadSize`]
//!
//! - **Error Handling**:
//!   - [`TransportError`]: what callers of a transport get back
//!   - [`Failure`]: a non-2xx or failed exchange
//!   - [`BackendError`], [`ParseError`], [`SendError`]: backend and codec errors

mod message;
pub use message::Message;
pub use message::PayloadItem;
pub use message::PayloadSize;

mod headers;
pub use headers::Headers;

mod method;
pub use method::MethodPlan;

mod info;
pub use info::TransportInfo;
pub use info::keys as info_keys;

mod response;
pub use response::Response;

mod response_header;
pub use response_header::ResponseHeader;

mod error;
pub use error::BackendError;
pub use error::Failure;
pub use error::ParseError;
pub use error::SendError;
pub use error::TransportError;
pub(crate) use error::UnknownError;
