use std::fmt;
use std::io::{Read, Seek};
use std::path::Path;

/// A readable, seekable upload source.
pub trait ReadSeek: Read + Seek {}

impl<T: Read + Seek + ?Sized> ReadSeek for T {}

/// Upload source for [`Transport::do_request_with_resource`](crate::transport::Transport::do_request_with_resource).
///
/// A path is opened read-only for the duration of the call. A stream is used
/// as-is from its current position: the caller rewinds it if the whole content
/// should be sent.
pub enum Resource<'a> {
    Path(&'a Path),
    Stream(&'a mut dyn ReadSeek),
}

impl<'a> Resource<'a> {
    pub fn path<P: AsRef<Path> + ?Sized>(path: &'a P) -> Self {
        Resource::Path(path.as_ref())
    }

    pub fn stream<S: ReadSeek>(stream: &'a mut S) -> Self {
        Resource::Stream(stream)
    }
}

impl fmt::Debug for Resource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Resource::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}
