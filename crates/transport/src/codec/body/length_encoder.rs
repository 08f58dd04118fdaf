use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::Encoder;

use crate::protocol::{PayloadItem, SendError};

/// Encodes an upload whose size was announced with `Content-Length`.
///
/// The upload must produce exactly the announced number of bytes, anything else
/// would leave the connection out of sync with the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LengthEncoder {
    /// bytes still expected
    length: u64,
    eof: bool,
}

impl LengthEncoder {
    pub fn new(length: u64) -> Self {
        Self { length, eof: false }
    }

    pub fn is_finish(&self) -> bool {
        self.eof
    }
}

impl<D: Buf> Encoder<PayloadItem<D>> for LengthEncoder {
    type Error = SendError;

    fn encode(&mut self, item: PayloadItem<D>, dst: &mut BytesMut) -> Result<(), Self::Error> {
        match item {
            PayloadItem::Chunk(mut bytes) => {
                let size = bytes.remaining() as u64;
                if size > self.length {
                    return Err(SendError::invalid_body(format!("upload exceeds content-length by {} bytes", size - self.length)));
                }
                dst.put(&mut bytes);
                self.length -= size;
                Ok(())
            }
            PayloadItem::Eof if self.length > 0 => {
                Err(SendError::invalid_body(format!("upload ended {} bytes short of content-length", self.length)))
            }
            PayloadItem::Eof => {
                self.eof = true;
                Ok(())
            }
        }
    }
}
