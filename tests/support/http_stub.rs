use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc::{self, Receiver};
use std::thread;

/// A request seen by the stub backend.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: String,
}

/// Tiny HTTP backend answering fixed JSON per path.
pub struct StubBackend {
    pub base_url: String,
    pub requests: Receiver<RecordedRequest>,
}

impl StubBackend {
    /// Serve `routes` (path -> JSON body) for up to `connections` requests.
    pub fn start(routes: &[(&str, &str)], connections: usize) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub backend");
        let addr = listener.local_addr().expect("stub backend addr");
        let routes: HashMap<String, String> = routes
            .iter()
            .map(|(path, body)| (path.to_string(), body.to_string()))
            .collect();
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            for stream in listener.incoming().take(connections) {
                let Ok(mut stream) = stream else { continue };
                let request = read_request(&mut stream);
                let response = match routes.get(&request.path) {
                    Some(body) => format!(
                        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        body.len(),
                        body
                    ),
                    None => "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
                        .to_string(),
                };
                let _ = stream.write_all(response.as_bytes());
                let _ = tx.send(request);
            }
        });
        Self {
            base_url: format!("http://{addr}"),
            requests: rx,
        }
    }
}

fn read_request(stream: &mut TcpStream) -> RecordedRequest {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    let mut header_end = None;
    let mut content_length = 0usize;
    loop {
        let read = match stream.read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(read) => read,
        };
        data.extend_from_slice(&buf[..read]);
        if header_end.is_none() {
            if let Some(pos) = find(&data, b"\r\n\r\n") {
                header_end = Some(pos);
                content_length = String::from_utf8_lossy(&data[..pos])
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse().ok())
                    .unwrap_or(0);
            }
        }
        if let Some(pos) = header_end {
            if data.len() >= pos + 4 + content_length {
                break;
            }
        }
    }
    let head_len = header_end.unwrap_or(data.len());
    let head = String::from_utf8_lossy(&data[..head_len]).into_owned();
    let body_start = (head_len + 4).min(data.len());
    let body = String::from_utf8_lossy(&data[body_start..]).into_owned();
    let mut request_line = head.lines().next().unwrap_or_default().split_whitespace();
    RecordedRequest {
        method: request_line.next().unwrap_or_default().to_string(),
        path: request_line.next().unwrap_or_default().to_string(),
        body,
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
