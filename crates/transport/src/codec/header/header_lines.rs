//! Line oriented header block handling.
//!
//! Backends hand request headers over as `Name: Value` lines and capture response
//! headers the same way, one header per line, optionally preceded by the status
//! line. [`HeaderCodec`] converts between a [`Headers`] mapping and those lines.

use std::io::{self, BufRead, BufReader, Read};

use tracing::trace;

use crate::protocol::Headers;

#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderCodec;

impl HeaderCodec {
    /// Serializes `headers` into `Name: Value` lines, keeping iteration order.
    ///
    /// Names and values are not validated here, the backend rejects what it can't send.
    pub fn serialize(headers: &Headers) -> Vec<String> {
        headers.iter().map(|(name, value)| format!("{name}: {value}")).collect()
    }

    /// Reads a raw header block until end of stream.
    ///
    /// Each line is trimmed and empty lines are dropped. Both `\r\n` and `\n`
    /// terminators are accepted and a leading status line is kept as is.
    ///
    /// # Errors
    ///
    /// Returns an error if reading from `src` fails.
    pub fn parse<R: Read>(src: R) -> io::Result<Vec<String>> {
        let mut lines = Vec::new();
        for line in BufReader::new(src).split(b'\n') {
            let line = line?;
            let line = String::from_utf8_lossy(&line);
            let line = line.trim();
            if !line.is_empty() {
                lines.push(line.to_owned());
            }
        }
        trace!(count = lines.len(), "parsed header lines");
        Ok(lines)
    }

    /// Splits a header line at its first colon into a trimmed name and value.
    ///
    /// Status lines and anything else without a colon, or with an empty or
    /// whitespace containing name, yield `None`.
    pub fn split_line(line: &str) -> Option<(&str, &str)> {
        let (name, value) = line.split_once(':')?;
        let name = name.trim();
        if name.is_empty() || name.contains(char::is_whitespace) {
            return None;
        }
        Some((name, value.trim()))
    }

    /// Finds the value of the first header named `name`, ignoring ASCII case.
    pub fn find<'a, S: AsRef<str>>(lines: &'a [S], name: &str) -> Option<&'a str> {
        lines
            .iter()
            .filter_map(|line| Self::split_line(line.as_ref()))
            .find(|(header_name, _)| header_name.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }

    /// Returns true if `line` looks like an http status line, e.g. `HTTP/1.1 200 OK`.
    pub fn is_status_line(line: &str) -> bool {
        line.starts_with("HTTP/")
    }
}
