//! Transport configuration.
//!
//! All fields have defaults, so a partial document deserializes fine:
//!
//! ```
//! use micro_transport::TransportConfig;
//!
//! let config: TransportConfig = serde_json::from_str(r#"{ "connect_timeout_seconds": 5 }"#).unwrap();
//! assert_eq!(config.connect_timeout().as_secs(), 5);
//! assert!(config.header_block_includes_status_line);
//! ```

use std::time::Duration;

use serde::Deserialize;

use crate::buffer::DEFAULT_SPILL_THRESHOLD;

/// Default base product token of the `User-Agent` header.
pub const DEFAULT_USER_AGENT: &str = concat!("micro-transport/", env!("CARGO_PKG_VERSION"));

/// Default bound on connection establishment.
pub const DEFAULT_CONNECT_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Base product token, the backend suffix is appended to it.
    pub user_agent: String,
    /// Replaces the backend's own suffix when set.
    pub user_agent_suffix: Option<String>,
    /// Bounds connection establishment only, transfers are unbounded.
    pub connect_timeout_seconds: u64,
    /// Whether the captured header block starts with the status line.
    pub header_block_includes_status_line: bool,
    /// Bytes a body buffer keeps in memory before moving to a temporary file.
    pub spill_threshold: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            user_agent_suffix: None,
            connect_timeout_seconds: DEFAULT_CONNECT_TIMEOUT_SECONDS,
            header_block_includes_status_line: true,
            spill_threshold: DEFAULT_SPILL_THRESHOLD,
        }
    }
}

impl TransportConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }

    /// `<user_agent><suffix>`, where the suffix is the configured one or else `backend_suffix`.
    pub fn user_agent_for(&self, backend_suffix: &str) -> String {
        let suffix = self.user_agent_suffix.as_deref().unwrap_or(backend_suffix);
        format!("{}{}", self.user_agent, suffix)
    }
}
