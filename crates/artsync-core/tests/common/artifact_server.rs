//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves fixed bodies by request path (`/repo/path`), answers 404 for anything
//! else, and counts GET requests so tests can assert that nothing was fetched.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

/// Handle to a running server.
pub struct ArtifactServer {
    pub base_url: String,
    gets: Arc<AtomicUsize>,
    last_headers: Arc<Mutex<Vec<String>>>,
}

impl ArtifactServer {
    /// Number of GET requests served so far (any status).
    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    /// Header lines of the most recent request.
    pub fn last_headers(&self) -> Vec<String> {
        self.last_headers.lock().unwrap().clone()
    }
}

/// Starts a server in a background thread serving `files` (path → body), e.g.
/// `("/generic/a/b.txt", b"...")`. The server runs until the process exits.
pub fn start(files: &[(&str, &[u8])]) -> ArtifactServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let files: Arc<HashMap<String, Vec<u8>>> = Arc::new(
        files
            .iter()
            .map(|(p, b)| (p.to_string(), b.to_vec()))
            .collect(),
    );
    let gets = Arc::new(AtomicUsize::new(0));
    let last_headers = Arc::new(Mutex::new(Vec::new()));
    {
        let gets = Arc::clone(&gets);
        let last_headers = Arc::clone(&last_headers);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let files = Arc::clone(&files);
                let gets = Arc::clone(&gets);
                let last_headers = Arc::clone(&last_headers);
                thread::spawn(move || handle(stream, &files, &gets, &last_headers));
            }
        });
    }
    ArtifactServer {
        base_url: format!("http://127.0.0.1:{}/", port),
        gets,
        last_headers,
    }
}

fn handle(
    mut stream: std::net::TcpStream,
    files: &HashMap<String, Vec<u8>>,
    gets: &AtomicUsize,
    last_headers: &Mutex<Vec<String>>,
) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let mut lines = request.lines();
    let request_line = lines.next().unwrap_or("");
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or("");
    let path = parts.next().unwrap_or("");
    let headers: Vec<String> = lines
        .map(str::trim)
        .take_while(|l| !l.is_empty())
        .map(str::to_string)
        .collect();
    if let Ok(mut last) = last_headers.lock() {
        *last = headers;
    }

    if !method.eq_ignore_ascii_case("GET") {
        let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        return;
    }
    gets.fetch_add(1, Ordering::SeqCst);
    match files.get(path) {
        Some(body) => {
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(body);
        }
        None => {
            let _ = stream.write_all(
                b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            );
        }
    }
}
