//! HTTP response decoder module
//!
//! Decodes a response from a streaming buffer in two phases:
//!
//! 1. Head parsing through [`HeaderDecoder`]. Interim `1xx` heads are consumed
//!    and skipped, only the final head is yielded.
//! 2. Payload parsing through [`PayloadDecoder`], selected from the head.
//!
//! # Example
//!
//! ```no_run
//! use micro_transport::codec::ResponseDecoder;
//! use tokio_util::codec::Decoder;
//! use bytes::BytesMut;
//!
//! let mut decoder = ResponseDecoder::new(true);
//! let mut buffer = BytesMut::new();
//! // ... read response bytes into buffer ...
//! let result = decoder.decode(&mut buffer);
//! ```

use bytes::BytesMut;
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::codec::body::PayloadDecoder;
use crate::codec::header::HeaderDecoder;
use crate::protocol::{Message, ParseError, PayloadItem, PayloadSize, ResponseHeader};

/// A decoder for one HTTP response, head and payload.
///
/// The decoder keeps its state in `payload_decoder`:
/// - `None`: parsing the head
/// - `Some(PayloadDecoder)`: parsing the payload
#[derive(Debug)]
pub struct ResponseDecoder {
    header_decoder: HeaderDecoder,
    payload_decoder: Option<PayloadDecoder>,
}

impl ResponseDecoder {
    /// `reads_body` is false when the request was HEAD.
    pub fn new(reads_body: bool) -> Self {
        Self { header_decoder: HeaderDecoder::new(reads_body), payload_decoder: None }
    }

    /// Returns true while decoding a payload that ends when the connection closes.
    pub fn is_close_delimited(&self) -> bool {
        self.payload_decoder.as_ref().is_some_and(PayloadDecoder::is_close_delimited)
    }
}

impl Decoder for ResponseDecoder {
    type Item = Message<(ResponseHeader, PayloadSize)>;
    type Error = ParseError;

    /// # Returns
    ///
    /// - `Ok(Some(Message::Header(_)))`: the final response head
    /// - `Ok(Some(Message::Payload(_)))`: a payload chunk or the end of the payload
    /// - `Ok(None)`: more data is needed
    ///
    /// # Errors
    ///
    /// Returns `ParseError` for a malformed head or payload.
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(payload_decoder) = &mut self.payload_decoder {
            let message = match payload_decoder.decode(src)? {
                Some(item @ PayloadItem::Chunk(_)) => Some(Message::Payload(item)),
                Some(item @ PayloadItem::Eof) => {
                    self.payload_decoder.take();
                    Some(Message::Payload(item))
                }
                None => None,
            };

            return Ok(message);
        }

        loop {
            let Some((header, payload_size)) = self.header_decoder.decode(src)? else {
                return Ok(None);
            };

            if header.status().is_informational() {
                trace!(status = header.status().as_u16(), "skip interim response");
                continue;
            }

            self.payload_decoder = Some(payload_size.into());
            return Ok(Some(Message::Header((header, payload_size))));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn collect_body(decoder: &mut ResponseDecoder, buf: &mut BytesMut) -> Vec<u8> {
        let mut body = Vec::new();
        loop {
            match decoder.decode(buf).unwrap() {
                Some(Message::Payload(PayloadItem::Chunk(bytes))) => body.extend_from_slice(&bytes),
                Some(Message::Payload(PayloadItem::Eof)) => return body,
                Some(Message::Header(_)) => panic!("unexpected header"),
                None => return body,
            }
        }
    }

    #[test]
    fn length_response() {
        let mut buf = BytesMut::from(indoc! {"
            HTTP/1.1 200 OK\r
            Content-Length: 5\r
            \r
            hello"});

        let mut decoder = ResponseDecoder::new(true);
        let Some(Message::Header((header, size))) = decoder.decode(&mut buf).unwrap() else {
            panic!("expect header");
        };
        assert_eq!(header.status().as_u16(), 200);
        assert_eq!(size, PayloadSize::Length(5));
        assert_eq!(collect_body(&mut decoder, &mut buf), b"hello");
        assert!(!decoder.is_close_delimited());
    }

    #[test]
    fn skip_continue() {
        let mut buf = BytesMut::from(indoc! {"
            HTTP/1.1 100 Continue\r
            \r
            HTTP/1.1 201 Created\r
            Transfer-Encoding: chunked\r
            \r
            3\r
            abc\r
            0\r
            \r
            "});

        let mut decoder = ResponseDecoder::new(true);
        let Some(Message::Header((header, size))) = decoder.decode(&mut buf).unwrap() else {
            panic!("expect header");
        };
        assert_eq!(header.status().as_u16(), 201);
        assert!(size.is_chunked());
        assert_eq!(collect_body(&mut decoder, &mut buf), b"abc");
    }

    #[test]
    fn close_delimited() {
        let mut buf = BytesMut::from("HTTP/1.0 200 OK\r\n\r\npartial");

        let mut decoder = ResponseDecoder::new(true);
        assert!(decoder.decode(&mut buf).unwrap().unwrap().is_header());
        assert!(decoder.is_close_delimited());
        assert_eq!(collect_body(&mut decoder, &mut buf), b"partial");
    }
}
