//! Blocking HTTP/1.1 backend over `std::net::TcpStream`.
//!
//! One connection per exchange, always closed afterwards (`Connection: close`).
//! The request goes out through [`RequestEncoder`], the response comes back
//! through [`ResponseDecoder`]. Only `http://` is supported.

use std::io::{self, ErrorKind, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};

use bytes::BytesMut;
use http::{Method, Uri, header};
use tokio_util::codec::{Decoder, Encoder};
use tracing::{debug, trace};

use crate::backend::{Backend, Exchange};
use crate::codec::{HeaderCodec, RequestEncoder, RequestHead, ResponseDecoder};
use crate::protocol::{BackendError, Message, MethodPlan, ParseError, PayloadItem, PayloadSize, SendError, TransportInfo, info_keys};

/// Suffix appended to the base `User-Agent` product token.
pub const USER_AGENT_SUFFIX: &str = " wire/1.1";

/// Bytes read from the socket at a time
const READ_CAPACITY: usize = 8 * 1024;

/// Bytes read from the upload source at a time
const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

const DEFAULT_PORT: u16 = 80;

#[derive(Debug, Clone, Copy, Default)]
pub struct WireBackend;

impl WireBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Backend for WireBackend {
    fn user_agent_suffix(&self) -> &str {
        USER_AGENT_SUFFIX
    }

    fn execute(&self, exchange: &mut Exchange<'_>, info: &mut TransportInfo) -> Result<(), BackendError> {
        let started = Instant::now();
        let mut counters = Counters::default();

        let result = exchange_over_tcp(exchange, info, &mut counters);

        info.insert(info_keys::SIZE_UPLOAD, counters.uploaded);
        info.insert(info_keys::SIZE_DOWNLOAD, counters.downloaded);
        info.insert(info_keys::TOTAL_TIME, format!("{:.6}", started.elapsed().as_secs_f64()));

        if let Err(e) = &result {
            debug!(uri = %exchange.uri, cause = %e, "wire exchange failed");
        }
        result
    }
}

#[derive(Debug, Default)]
struct Counters {
    uploaded: u64,
    downloaded: u64,
}

/// Where to connect and what to put in the `Host` header.
#[derive(Debug)]
struct Target<'a> {
    host: &'a str,
    port: u16,
    authority: String,
    request_target: &'a str,
}

impl<'a> Target<'a> {
    fn from_uri(uri: &'a Uri) -> Result<Self, BackendError> {
        match uri.scheme_str() {
            Some(scheme) if scheme.eq_ignore_ascii_case("http") => {}
            Some(scheme) => return Err(BackendError::unsupported_scheme(scheme)),
            None => return Err(BackendError::unsupported_scheme("")),
        }

        let host = uri.host().ok_or(BackendError::MissingHost)?;
        let authority = match uri.port_u16() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };

        let request_target = match uri.path_and_query().map(|pq| pq.as_str()) {
            Some(target) if !target.is_empty() => target,
            _ => "/",
        };

        Ok(Self {
            host: host.trim_start_matches('[').trim_end_matches(']'),
            port: uri.port_u16().unwrap_or(DEFAULT_PORT),
            authority,
            request_target,
        })
    }
}

fn exchange_over_tcp(exchange: &mut Exchange<'_>, info: &mut TransportInfo, counters: &mut Counters) -> Result<(), BackendError> {
    let target = Target::from_uri(exchange.uri)?;
    let mut stream = connect(&target, exchange.connect_timeout)?;

    if let Ok(peer) = stream.peer_addr() {
        info.insert(info_keys::PRIMARY_IP, peer.ip());
    }

    if let Err(e) = send_request(&mut stream, exchange, &target, counters) {
        if !is_write_error(&e) {
            return Err(e);
        }

        // the server may have answered before reading the whole upload
        debug!(uri = %exchange.uri, cause = %e, "request write failed, reading early response");
        if let Err(cause) = receive_response(&mut stream, exchange, info, counters) {
            trace!(%cause, "early response incomplete");
        }
        return Err(e);
    }

    receive_response(&mut stream, exchange, info, counters)
}

fn connect(target: &Target<'_>, timeout: Duration) -> Result<TcpStream, BackendError> {
    let addrs = (target.host, target.port)
        .to_socket_addrs()
        .map_err(|source| BackendError::Resolve { host: target.host.to_string(), source })?;

    let mut last_error = None;
    for addr in addrs {
        // a zero timeout is rejected by connect_timeout, treat it as unbounded
        let result = if timeout.is_zero() { TcpStream::connect(addr) } else { TcpStream::connect_timeout(&addr, timeout) };

        match result {
            Ok(stream) => {
                stream.set_nodelay(true)?;
                trace!(%addr, "connected");
                return Ok(stream);
            }
            Err(e) => {
                debug!(%addr, cause = %e, "connect attempt failed");
                last_error = Some(e);
            }
        }
    }

    let source = last_error.unwrap_or_else(|| io::Error::new(ErrorKind::NotFound, "host resolved to no address"));
    Err(BackendError::Connect { host: target.host.to_string(), source })
}

fn send_request(stream: &mut TcpStream, exchange: &mut Exchange<'_>, target: &Target<'_>, counters: &mut Counters) -> Result<(), BackendError> {
    let mut lines = Vec::with_capacity(exchange.header_lines.len() + 3);
    if HeaderCodec::find(exchange.header_lines, header::HOST.as_str()).is_none() {
        lines.push(format!("Host: {}", target.authority));
    }
    if HeaderCodec::find(exchange.header_lines, header::USER_AGENT.as_str()).is_none() {
        lines.push(format!("User-Agent: {}", exchange.user_agent));
    }
    lines.extend(exchange.header_lines.iter().filter(|line| !is_connection_line(line)).cloned());
    lines.push("Connection: close".to_string());

    let payload_size = match &exchange.upload {
        Some(upload) => upload.size_hint.map_or(PayloadSize::Chunked, PayloadSize::Length),
        None if expects_body(exchange.plan) => PayloadSize::Length(0),
        None => PayloadSize::Empty,
    };

    let head = RequestHead { method: exchange.plan.method(), target: target.request_target.to_string(), lines };
    trace!(method = %head.method, target = %head.target, ?payload_size, "send request head");

    let mut encoder = RequestEncoder::new();
    let mut buf = BytesMut::with_capacity(READ_CAPACITY);
    encoder.encode(Message::<_, &[u8]>::Header((head, payload_size)), &mut buf)?;
    write_to(stream, &buf)?;
    buf.clear();

    if let Some(upload) = exchange.upload.as_mut() {
        let mut chunk = vec![0u8; UPLOAD_CHUNK_SIZE];
        loop {
            let n = match upload.reader.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };

            encoder.encode(Message::<(RequestHead, PayloadSize), &[u8]>::Payload(PayloadItem::Chunk(&chunk[..n])), &mut buf)?;
            write_to(stream, &buf)?;
            buf.clear();
            counters.uploaded += n as u64;
        }

        encoder.encode(Message::<(RequestHead, PayloadSize), &[u8]>::Payload(PayloadItem::Eof), &mut buf)?;
        write_to(stream, &buf)?;
    }

    stream.flush().map_err(SendError::io)?;
    Ok(())
}

/// Socket writes fail as [`SendError::Io`], upload reads as plain io errors.
fn write_to(stream: &mut TcpStream, buf: &[u8]) -> Result<(), SendError> {
    stream.write_all(buf).map_err(SendError::io)
}

fn is_write_error(e: &BackendError) -> bool {
    matches!(e, BackendError::Send { source: SendError::Io { .. } })
}

fn receive_response(
    stream: &mut TcpStream,
    exchange: &mut Exchange<'_>,
    info: &mut TransportInfo,
    counters: &mut Counters,
) -> Result<(), BackendError> {
    let mut decoder = ResponseDecoder::new(exchange.plan.reads_body());
    let mut buf = BytesMut::with_capacity(READ_CAPACITY);

    loop {
        match decoder.decode(&mut buf)? {
            Some(Message::Header((head, payload_size))) => {
                trace!(status = head.status().as_u16(), ?payload_size, "received response head");
                let block = if exchange.include_status_line { &head.raw()[..] } else { head.raw_fields() };
                exchange.header_sink.write_all(block)?;

                info.set_http_status_code(head.status().as_u16());
                info.insert(info_keys::HEADER_SIZE, head.raw().len());
                if let Some(content_type) = head.headers().get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()) {
                    info.insert(info_keys::CONTENT_TYPE, content_type);
                }
            }

            Some(Message::Payload(PayloadItem::Chunk(bytes))) => {
                exchange.body_sink.write_all(&bytes)?;
                counters.downloaded += bytes.len() as u64;
            }

            Some(Message::Payload(PayloadItem::Eof)) => return Ok(()),

            None => {
                if fill(stream, &mut buf)? == 0 {
                    if decoder.is_close_delimited() {
                        return Ok(());
                    }
                    return Err(ParseError::UnexpectedEof.into());
                }
            }
        }
    }
}

/// Reads once from the socket into the spare capacity of `buf`.
fn fill(stream: &mut TcpStream, buf: &mut BytesMut) -> io::Result<usize> {
    let start = buf.len();
    buf.resize(start + READ_CAPACITY, 0);

    loop {
        match stream.read(&mut buf[start..]) {
            Ok(n) => {
                buf.truncate(start + n);
                return Ok(n);
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => {
                buf.truncate(start);
                return Err(e);
            }
        }
    }
}

/// PUT and POST announce an empty body instead of sending no framing at all.
fn expects_body(plan: &MethodPlan) -> bool {
    match plan {
        MethodPlan::Put => true,
        MethodPlan::Custom(method) => *method == Method::POST,
        MethodPlan::Get | MethodPlan::Head => false,
    }
}

fn is_connection_line(line: &str) -> bool {
    HeaderCodec::split_line(line).is_some_and(|(name, _)| name.eq_ignore_ascii_case(header::CONNECTION.as_str()))
}
