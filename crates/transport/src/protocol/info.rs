//! Backend reported metadata about a finished exchange.
//!
//! Only the status code and the effective url are part of the transport contract.
//! Everything else a backend knows about the exchange (remote address, transfer
//! sizes, timings) is carried as an open string map and passed through untouched
//! to the [`Response`](crate::protocol::Response) or [`Failure`](crate::protocol::Failure).

use std::collections::BTreeMap;

use serde::Serialize;

/// Well known keys used by the backends shipped with this crate.
pub mod keys {
    pub const PRIMARY_IP: &str = "primary_ip";
    pub const SIZE_UPLOAD: &str = "size_upload";
    pub const SIZE_DOWNLOAD: &str = "size_download";
    pub const HEADER_SIZE: &str = "header_size";
    pub const TOTAL_TIME: &str = "total_time";
    pub const CONTENT_TYPE: &str = "content_type";
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransportInfo {
    http_status_code: u16,
    effective_url: String,
    #[serde(flatten)]
    extra: BTreeMap<String, String>,
}

impl TransportInfo {
    /// Creates the info for an exchange that hasn't produced any status yet.
    pub fn new<S: Into<String>>(effective_url: S) -> Self {
        Self { http_status_code: 0, effective_url: effective_url.into(), extra: BTreeMap::new() }
    }

    /// The numeric status of the response, `0` when no http exchange happened.
    pub fn http_status_code(&self) -> u16 {
        self.http_status_code
    }

    pub fn set_http_status_code(&mut self, status: u16) {
        self.http_status_code = status;
    }

    pub fn effective_url(&self) -> &str {
        &self.effective_url
    }

    pub fn set_effective_url<S: Into<String>>(&mut self, url: S) {
        self.effective_url = url.into();
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.extra.get(key).map(String::as_str)
    }

    pub fn insert<K: Into<String>, V: ToString>(&mut self, key: K, value: V) -> Option<String> {
        self.extra.insert(key.into(), value.to_string())
    }

    /// Iterates the backend specific entries in key order.
    pub fn extra(&self) -> impl Iterator<Item = (&str, &str)> {
        self.extra.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
