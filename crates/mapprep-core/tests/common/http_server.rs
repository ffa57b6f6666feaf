//! Minimal HTTP/1.1 server with scripted per-path responses for integration tests.
//!
//! Each path serves a fixed body, a bare status, or a redirect. Every request
//! is counted and its User-Agent recorded so tests can assert on traffic.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum Route {
    /// 200 OK with this body.
    Body(Vec<u8>),
    /// Given status with an empty body.
    Status(u16),
    /// 302 Found pointing at this location (absolute or relative).
    Redirect(String),
    /// Redirect with a custom status code.
    RedirectWith(u16, String),
}

pub struct TestServer {
    /// e.g. "http://127.0.0.1:12345"
    pub base_url: String,
    hits: Arc<AtomicUsize>,
    user_agents: Arc<Mutex<Vec<String>>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Number of requests served so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn user_agents(&self) -> Vec<String> {
        self.user_agents.lock().unwrap().clone()
    }
}

/// Starts a server in a background thread. Unknown paths get 404.
/// The server runs until the process exits.
pub fn start(routes: Vec<(&str, Route)>) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes: Arc<HashMap<String, Route>> = Arc::new(
        routes
            .into_iter()
            .map(|(p, r)| (p.to_string(), r))
            .collect(),
    );
    let hits = Arc::new(AtomicUsize::new(0));
    let user_agents = Arc::new(Mutex::new(Vec::new()));
    {
        let hits = Arc::clone(&hits);
        let user_agents = Arc::clone(&user_agents);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let routes = Arc::clone(&routes);
                let hits = Arc::clone(&hits);
                let user_agents = Arc::clone(&user_agents);
                thread::spawn(move || handle(stream, &routes, &hits, &user_agents));
            }
        });
    }
    TestServer {
        base_url: format!("http://127.0.0.1:{}", port),
        hits,
        user_agents,
    }
}

fn handle(
    mut stream: TcpStream,
    routes: &HashMap<String, Route>,
    hits: &AtomicUsize,
    user_agents: &Mutex<Vec<String>>,
) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
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
    let (path, user_agent) = parse_request(request);
    hits.fetch_add(1, Ordering::SeqCst);
    if let Some(ua) = user_agent {
        user_agents.lock().unwrap().push(ua.to_string());
    }

    let (status, extra, body): (String, String, &[u8]) = match routes.get(path) {
        Some(Route::Body(body)) => ("200 OK".into(), String::new(), body.as_slice()),
        Some(Route::Status(code)) => (format!("{} Scripted", code), String::new(), &b""[..]),
        Some(Route::Redirect(location)) => (
            "302 Found".into(),
            format!("Location: {}\r\n", location),
            &b""[..],
        ),
        Some(Route::RedirectWith(code, location)) => (
            format!("{} Moved", code),
            format!("Location: {}\r\n", location),
            &b""[..],
        ),
        None => ("404 Not Found".into(), String::new(), &b""[..]),
    };
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n{}\r\n",
        status,
        body.len(),
        extra
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.write_all(body);
}

/// Returns (path, optional User-Agent value).
fn parse_request(request: &str) -> (&str, Option<&str>) {
    let mut path = "";
    let mut user_agent = None;
    for (i, line) in request.lines().enumerate() {
        let line = line.trim();
        if i == 0 {
            path = line.split_whitespace().nth(1).unwrap_or("");
            continue;
        }
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("user-agent") {
                user_agent = Some(value.trim());
            }
        }
    }
    (path, user_agent)
}
