//! A local blocking server that answers one connection with a canned response
//! and hands back the raw request it received.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};

use tracing_subscriber::EnvFilter;

pub struct Server {
    base: String,
    handle: JoinHandle<String>,
}

impl Server {
    pub fn uri(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Waits for the exchange to finish and returns the raw request.
    pub fn request(self) -> String {
        self.handle.join().unwrap()
    }
}

/// Reads the whole request, then replies.
pub fn serve(response: &'static str) -> Server {
    spawn(move |stream| {
        let request = read_request(stream);
        stream.write_all(response.as_bytes()).unwrap();
        request
    })
}

/// Replies after the first read and closes without draining the request.
pub fn serve_early(response: &'static str) -> Server {
    spawn(move |stream| {
        let mut chunk = [0u8; 1024];
        let n = stream.read(&mut chunk).unwrap();
        stream.write_all(response.as_bytes()).unwrap();
        chunk[..n].to_vec()
    })
}

fn spawn<F>(handler: F) -> Server
where
    F: FnOnce(&mut TcpStream) -> Vec<u8> + Send + 'static,
{
    let _ = tracing_subscriber::fmt().with_test_writer().with_env_filter(EnvFilter::from_default_env()).try_init();

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let request = handler(&mut stream);
        String::from_utf8_lossy(&request).into_owned()
    });
    Server { base, handle }
}

fn read_request(stream: &mut TcpStream) -> Vec<u8> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    while !request_complete(&buf) {
        let n = stream.read(&mut chunk).unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    buf
}

fn request_complete(buf: &[u8]) -> bool {
    let mut headers = [httparse::EMPTY_HEADER; 32];
    let mut request = httparse::Request::new(&mut headers);
    let Ok(httparse::Status::Complete(offset)) = request.parse(buf) else {
        return false;
    };

    let body = &buf[offset..];
    for header in request.headers.iter() {
        if header.name.eq_ignore_ascii_case("content-length") {
            let length: usize = std::str::from_utf8(header.value).unwrap().parse().unwrap();
            return body.len() >= length;
        }
        if header.name.eq_ignore_ascii_case("transfer-encoding") {
            return body.ends_with(b"0\r\n\r\n");
        }
    }
    true
}
