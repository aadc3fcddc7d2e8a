//! Loopback HTTP fixture server.
//!
//! Binds `127.0.0.1:0`, answers every connection on its own thread with a canned
//! [`Reply`], and records the request target of each request so tests can assert on
//! the exact URL that was sent.
//!
//! ```no_run
//! use tweet_search_test_utils::{MockServer, Reply};
//!
//! let server = MockServer::start(Reply::json(r#"{"results":[]}"#));
//! let url = server.url("/search.json");
//! // ... point a client at `url` ...
//! assert_eq!(server.requests().len(), 1);
//! ```

use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

/// Canned response for one request.
#[derive(Debug, Clone)]
pub struct Reply {
    status: u16,
    body: String,
    hang_up: bool,
}

impl Reply {
    /// `200 OK` with a JSON body
    pub fn json(body: impl Into<String>) -> Self {
        Self::status(200, body)
    }

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            hang_up: false,
        }
    }

    /// Close the connection after reading the request, without writing a response.
    pub fn hang_up() -> Self {
        Self {
            hang_up: true,
            ..Self::status(200, "")
        }
    }

    fn write_to(&self, stream: &mut TcpStream) -> std::io::Result<()> {
        let head = format!(
            "HTTP/1.1 {} {}\r\nContent-Type: application/json; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            self.status,
            reason_phrase(self.status),
            self.body.len()
        );
        stream.write_all(head.as_bytes())?;
        stream.write_all(self.body.as_bytes())?;
        stream.flush()
    }
}

type Handler = dyn Fn(&str) -> Reply + Send + Sync;

pub struct MockServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockServer {
    /// Serve the same reply to every request.
    pub fn start(reply: Reply) -> Self {
        Self::with_handler(move |_| reply.clone())
    }

    /// Serve replies computed from the request target (path plus query).
    pub fn with_handler<F>(handler: F) -> Self
    where
        F: Fn(&str) -> Reply + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock server");
        let addr = listener.local_addr().expect("mock server address");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let handler: Arc<Handler> = Arc::new(handler);

        let recorded = Arc::clone(&requests);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { continue };
                let handler = Arc::clone(&handler);
                let recorded = Arc::clone(&recorded);
                thread::spawn(move || {
                    if let Err(e) = serve(stream, handler.as_ref(), &recorded) {
                        log::debug!("mock server connection error: {}", e);
                    }
                });
            }
        });

        Self { addr, requests }
    }

    /// Absolute URL for `path` on this server.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Request targets received so far, in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("requests lock").clone()
    }

    /// Decoded value of query parameter `name` in the `index`-th request.
    pub fn query_param(&self, index: usize, name: &str) -> Option<String> {
        let target = self.requests().get(index)?.clone();
        let url = url::Url::parse(&format!("http://{}{}", self.addr, target)).ok()?;
        url.query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }
}

fn serve(
    mut stream: TcpStream,
    handler: &Handler,
    recorded: &Mutex<Vec<String>>,
) -> std::io::Result<()> {
    let mut reader = BufReader::new(stream.try_clone()?);

    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;
    let target = request_line
        .split_whitespace()
        .nth(1)
        .unwrap_or("/")
        .to_string();

    // Drain headers; requests carry no body.
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 || line == "\r\n" || line == "\n" {
            break;
        }
    }

    recorded.lock().expect("requests lock").push(target.clone());

    let reply = handler(&target);
    if reply.hang_up {
        return Ok(());
    }
    reply.write_to(&mut stream)
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        403 => "Forbidden",
        404 => "Not Found",
        420 => "Enhance Your Calm",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}
