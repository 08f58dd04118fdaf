//! Mapping of request method names onto backend behavior.
//!
//! Backends don't look at the method string themselves. The transporter resolves
//! it once into a [`MethodPlan`] which tells the backend whether an upload may be
//! attached, whether a response body should be read, and which verb to put on
//! the wire.

use std::fmt;

use http::Method;

use crate::protocol::TransportError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodPlan {
    /// Plain GET, the request never carries a body.
    Get,
    /// HEAD, the response carries no body.
    Head,
    /// PUT with an upload; an absent or empty upload is allowed.
    Put,
    /// Any other verb (POST, DELETE, COPY, ...) sent verbatim with raw body semantics.
    Custom(Method),
}

impl MethodPlan {
    /// Resolves a method name, ignoring ASCII case.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::InvalidMethod`] if the name is empty or is not a
    /// valid http token.
    pub fn dispatch(method: &str) -> Result<Self, TransportError> {
        let canonical = method.trim().to_ascii_uppercase();
        let method = Method::from_bytes(canonical.as_bytes()).map_err(|_e| TransportError::invalid_method(method))?;

        let plan = match method {
            Method::GET => MethodPlan::Get,
            Method::HEAD => MethodPlan::Head,
            Method::PUT => MethodPlan::Put,
            other => MethodPlan::Custom(other),
        };
        Ok(plan)
    }

    /// The verb written on the wire.
    pub fn method(&self) -> Method {
        match self {
            MethodPlan::Get => Method::GET,
            MethodPlan::Head => Method::HEAD,
            MethodPlan::Put => Method::PUT,
            MethodPlan::Custom(method) => method.clone(),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            MethodPlan::Get => "GET",
            MethodPlan::Head => "HEAD",
            MethodPlan::Put => "PUT",
            MethodPlan::Custom(method) => method.as_str(),
        }
    }

    /// Returns true if an upload source may be attached for this method.
    #[inline]
    pub fn sends_body(&self) -> bool {
        matches!(self, MethodPlan::Put | MethodPlan::Custom(_))
    }

    /// Returns false for methods whose response never has a body.
    #[inline]
    pub fn reads_body(&self) -> bool {
        !matches!(self, MethodPlan::Head)
    }
}

impl fmt::Display for MethodPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
