//! Decoder for chunked response payloads, see
//! [RFC 9112 Section 7.1](https://www.rfc-editor.org/rfc/rfc9112#section-7.1).
//!
//! Chunk extensions and trailer fields are read and discarded.

use std::io;
use std::io::ErrorKind;

use bytes::{Buf, BytesMut};
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::protocol::{ParseError, PayloadItem};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkedDecoder {
    state: State,
    remaining: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// hex digits of the chunk size
    Size,
    /// whitespace after the size
    SizeLws,
    /// `;name=value` after the size, ignored
    Extension,
    /// LF closing the size line
    SizeLf,
    /// chunk data
    Data,
    /// CR after chunk data
    DataCr,
    /// LF after chunk data
    DataLf,
    /// start of a trailer line, or the final CR
    TrailerStart,
    /// inside a trailer field line
    Trailer,
    /// LF closing a trailer line
    TrailerLf,
    /// final LF
    EndLf,
    /// payload complete
    Done,
}

impl ChunkedDecoder {
    pub fn new() -> Self {
        Self { state: State::Size, remaining: 0 }
    }
}

impl Default for ChunkedDecoder {
    fn default() -> Self {
        Self::new()
    }
}

fn invalid(msg: &'static str) -> ParseError {
    ParseError::io(io::Error::new(ErrorKind::InvalidData, msg))
}

impl Decoder for ChunkedDecoder {
    type Item = PayloadItem;
    type Error = ParseError;

    /// # Returns
    /// - `Ok(Some(PayloadItem::Chunk(bytes)))` for each piece of chunk data available
    /// - `Ok(Some(PayloadItem::Eof))` once the last chunk and trailers are read
    /// - `Ok(None)` when more data is needed
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        loop {
            if self.state == State::Done {
                trace!("finished reading chunked payload");
                return Ok(Some(PayloadItem::Eof));
            }

            if src.is_empty() {
                return Ok(None);
            }

            if self.state == State::Data {
                let len = usize::try_from(self.remaining).unwrap_or(usize::MAX).min(src.len());
                let bytes = src.split_to(len).freeze();
                self.remaining -= len as u64;
                if self.remaining == 0 {
                    self.state = State::DataCr;
                }
                trace!(len, "read chunk data");
                return Ok(Some(PayloadItem::Chunk(bytes)));
            }

            let byte = src.get_u8();
            self.state = self.step(byte)?;
        }
    }
}

impl ChunkedDecoder {
    fn step(&mut self, byte: u8) -> Result<State, ParseError> {
        use State::*;

        let next = match (self.state, byte) {
            (Size, b) if b.is_ascii_hexdigit() => {
                let digit = u64::from((b as char).to_digit(16).unwrap_or_default());
                self.remaining = self
                    .remaining
                    .checked_mul(16)
                    .and_then(|size| size.checked_add(digit))
                    .ok_or_else(|| invalid("chunk size overflow"))?;
                Size
            }
            (Size | SizeLws, b'\t' | b' ') => SizeLws,
            (Size | SizeLws, b';') => Extension,
            (Size | SizeLws | Extension, b'\r') => SizeLf,
            (Size | SizeLws, _) => return Err(invalid("invalid chunk size line")),

            (Extension, b'\n') => return Err(invalid("chunk extension contains newline")),
            (Extension, _) => Extension,

            (SizeLf, b'\n') if self.remaining == 0 => TrailerStart,
            (SizeLf, b'\n') => Data,
            (SizeLf, _) => return Err(invalid("invalid chunk size LF")),

            (DataCr, b'\r') => DataLf,
            (DataCr, _) => return Err(invalid("invalid chunk data CR")),
            (DataLf, b'\n') => Size,
            (DataLf, _) => return Err(invalid("invalid chunk data LF")),

            (TrailerStart, b'\r') => EndLf,
            (TrailerStart | Trailer, b'\r') => TrailerLf,
            (TrailerStart | Trailer, _) => Trailer,
            (TrailerLf, b'\n') => TrailerStart,
            (TrailerLf, _) => return Err(invalid("invalid trailer LF")),

            (EndLf, b'\n') => Done,
            (EndLf, _) => return Err(invalid("invalid chunked end LF")),

            (Data | Done, _) => self.state,
        };
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn chunk(decoder: &mut ChunkedDecoder, buffer: &mut BytesMut) -> Bytes {
        decoder.decode(buffer).unwrap().unwrap().as_bytes().unwrap().clone()
    }

    #[test]
    fn test_basic() {
        let mut buffer = BytesMut::from(&b"10\r\n1234567890abcdef\r\n0\r\n\r\n"[..]);
        let mut decoder = ChunkedDecoder::new();

        assert_eq!(&chunk(&mut decoder, &mut buffer)[..], b"1234567890abcdef");
        assert!(decoder.decode(&mut buffer).unwrap().unwrap().is_eof());
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_multiple_chunks_with_extension() {
        let mut buffer = BytesMut::from(&b"5;name=value\r\nhello\r\n7 \r\n, world\r\n0\r\n\r\n"[..]);
        let mut decoder = ChunkedDecoder::new();

        assert_eq!(&chunk(&mut decoder, &mut buffer)[..], b"hello");
        assert_eq!(&chunk(&mut decoder, &mut buffer)[..], b", world");
        assert!(decoder.decode(&mut buffer).unwrap().unwrap().is_eof());
    }

    #[test]
    fn test_trailers() {
        let mut buffer = BytesMut::from(&b"5\r\nhello\r\n0\r\nX-Checksum: abc\r\n\r\n"[..]);
        let mut decoder = ChunkedDecoder::new();

        assert_eq!(&chunk(&mut decoder, &mut buffer)[..], b"hello");
        assert!(decoder.decode(&mut buffer).unwrap().unwrap().is_eof());
    }

    #[test]
    fn test_incomplete_chunk() {
        let mut buffer = BytesMut::from(&b"5\r\nhel"[..]);
        let mut decoder = ChunkedDecoder::new();

        assert_eq!(&chunk(&mut decoder, &mut buffer)[..], b"hel");
        assert!(decoder.decode(&mut buffer).unwrap().is_none());

        buffer.extend_from_slice(b"lo\r\n0\r\n");
        assert_eq!(&chunk(&mut decoder, &mut buffer)[..], b"lo");
        assert!(decoder.decode(&mut buffer).unwrap().is_none());

        buffer.extend_from_slice(b"\r\n");
        assert!(decoder.decode(&mut buffer).unwrap().unwrap().is_eof());
    }

    #[test]
    fn test_invalid() {
        let mut decoder = ChunkedDecoder::new();
        assert!(decoder.decode(&mut BytesMut::from(&b"xyz\r\n"[..])).is_err());

        let mut decoder = ChunkedDecoder::new();
        let mut buffer = BytesMut::from(&b"5\r\nhelloBad"[..]);
        assert_eq!(&chunk(&mut decoder, &mut buffer)[..], b"hello");
        assert!(decoder.decode(&mut buffer).is_err());

        let mut decoder = ChunkedDecoder::new();
        assert!(decoder.decode(&mut BytesMut::from(&b"fffffffffffffffff\r\n"[..])).is_err());
    }
}
