//! Scripted backend for tests.
//!
//! Records every exchange it is asked to execute and answers with a fixed
//! [`Reply`], without any network activity.

use std::io::{self, ErrorKind, Read, Write};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tracing::trace;

use crate::backend::{Backend, Exchange};
use crate::codec::HeaderCodec;
use crate::protocol::{BackendError, MethodPlan, TransportInfo};

pub const USER_AGENT_SUFFIX: &str = " recording";

/// What the backend answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// A completed exchange. `header_lines` may start with a status line.
    Respond { status: u16, header_lines: Vec<String>, body: Vec<u8> },
    /// No HTTP exchange took place; nothing is captured and `status` is reported as is.
    Unreachable { status: u16 },
}

/// One exchange as the backend saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedExchange {
    pub uri: String,
    pub plan: MethodPlan,
    pub header_lines: Vec<String>,
    /// The upload content, `None` if no upload was attached.
    pub upload: Option<Vec<u8>>,
    pub size_hint: Option<u64>,
    pub user_agent: String,
    pub connect_timeout: Duration,
    pub include_status_line: bool,
}

#[derive(Debug)]
pub struct RecordingBackend {
    reply: Reply,
    exchanges: Mutex<Vec<RecordedExchange>>,
}

impl RecordingBackend {
    pub fn new(reply: Reply) -> Self {
        Self { reply, exchanges: Mutex::new(Vec::new()) }
    }

    pub fn respond<I, S, B>(status: u16, header_lines: I, body: B) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        B: Into<Vec<u8>>,
    {
        Self::new(Reply::Respond { status, header_lines: header_lines.into_iter().map(Into::into).collect(), body: body.into() })
    }

    pub fn unreachable(status: u16) -> Self {
        Self::new(Reply::Unreachable { status })
    }

    /// All exchanges executed so far, oldest first.
    pub fn exchanges(&self) -> Vec<RecordedExchange> {
        self.exchanges.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Removes and returns all exchanges executed so far.
    pub fn take_exchanges(&self) -> Vec<RecordedExchange> {
        std::mem::take(&mut *self.exchanges.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn last_exchange(&self) -> Option<RecordedExchange> {
        self.exchanges.lock().unwrap_or_else(PoisonError::into_inner).last().cloned()
    }

    fn record(&self, exchange: &mut Exchange<'_>) -> io::Result<()> {
        let (upload, size_hint) = match exchange.upload.as_mut() {
            Some(upload) => {
                let mut content = Vec::new();
                upload.reader.read_to_end(&mut content)?;
                (Some(content), upload.size_hint)
            }
            None => (None, None),
        };

        let recorded = RecordedExchange {
            uri: exchange.uri.to_string(),
            plan: exchange.plan.clone(),
            header_lines: exchange.header_lines.to_vec(),
            upload,
            size_hint,
            user_agent: exchange.user_agent.to_string(),
            connect_timeout: exchange.connect_timeout,
            include_status_line: exchange.include_status_line,
        };

        trace!(uri = %recorded.uri, plan = %recorded.plan, "record exchange");
        self.exchanges.lock().unwrap_or_else(PoisonError::into_inner).push(recorded);
        Ok(())
    }
}

impl Backend for RecordingBackend {
    fn user_agent_suffix(&self) -> &str {
        USER_AGENT_SUFFIX
    }

    fn execute(&self, exchange: &mut Exchange<'_>, info: &mut TransportInfo) -> Result<(), BackendError> {
        self.record(exchange)?;

        match &self.reply {
            Reply::Respond { status, header_lines, body } => {
                for line in header_lines {
                    if !exchange.include_status_line && HeaderCodec::is_status_line(line) {
                        continue;
                    }
                    exchange.header_sink.write_all(line.as_bytes())?;
                    exchange.header_sink.write_all(b"\r\n")?;
                }

                if exchange.plan.reads_body() {
                    exchange.body_sink.write_all(body)?;
                }

                info.set_http_status_code(*status);
                Ok(())
            }

            Reply::Unreachable { status } => {
                info.set_http_status_code(*status);
                let host = exchange.uri.host().unwrap_or_default().to_string();
                Err(BackendError::Connect { host, source: io::Error::from(ErrorKind::ConnectionRefused) })
            }
        }
    }
}
