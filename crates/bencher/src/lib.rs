//! Shared fixtures for the wire codec benchmarks.

/// A named benchmark input.
#[derive(Debug, Copy, Clone)]
pub struct TestCase {
    name: &'static str,
    file: TestFile,
    /// false when the fixture answers a HEAD request
    reads_body: bool,
}

impl TestCase {
    pub fn new(name: &'static str, file: TestFile) -> Self {
        Self { name, file, reads_body: true }
    }

    pub fn without_body(name: &'static str, file: TestFile) -> Self {
        Self { name, file, reads_body: false }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn file(&self) -> &TestFile {
        &self.file
    }

    pub fn reads_body(&self) -> bool {
        self.reads_body
    }
}

/// A captured raw response.
#[derive(Debug, Copy, Clone)]
pub struct TestFile {
    file_name: &'static str,
    content: &'static str,
}

impl TestFile {
    pub const fn new(file_name: &'static str, content: &'static str) -> Self {
        Self { file_name, content }
    }

    pub fn content(&self) -> &'static str {
        self.content
    }

    pub fn file_name(&self) -> &'static str {
        self.file_name
    }

    /// The header block, up to and including the empty line.
    pub fn head(&self) -> &'static str {
        match self.content.find("\r\n\r\n") {
            Some(index) => &self.content[..index + 4],
            None => self.content,
        }
    }
}

pub static DELETE_SMALL: TestFile = TestFile::new("delete_small.txt", include_str!("../resources/response/delete_small.txt"));
pub static GET_LARGE: TestFile = TestFile::new("get_large.txt", include_str!("../resources/response/get_large.txt"));
pub static GET_CHUNKED: TestFile = TestFile::new("get_chunked.txt", include_str!("../resources/response/get_chunked.txt"));
