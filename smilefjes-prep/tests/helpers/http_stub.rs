//! Minimal canned-response HTTP server on a local port
//!
//! Routes match on the request-target prefix (path plus query). Unmatched
//! requests get an empty 404. Every response closes the connection.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
struct Route {
    prefix: String,
    status: u16,
    body: String,
}

pub struct HttpStub {
    addr: SocketAddr,
    targets: Arc<Mutex<Vec<String>>>,
    task: JoinHandle<()>,
}

#[derive(Default)]
pub struct HttpStubBuilder {
    routes: Vec<Route>,
}

impl HttpStubBuilder {
    pub fn route(mut self, prefix: &str, status: u16, body: &str) -> Self {
        self.routes.push(Route {
            prefix: prefix.to_string(),
            status,
            body: body.to_string(),
        });
        self
    }

    pub async fn start(self) -> HttpStub {
        bypass_proxy_for_loopback();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let targets = Arc::new(Mutex::new(Vec::new()));
        let routes = Arc::new(self.routes);

        let seen = targets.clone();
        let task = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let routes = routes.clone();
                let seen = seen.clone();
                tokio::spawn(async move {
                    serve(stream, &routes, &seen).await;
                });
            }
        });

        HttpStub { addr, targets, task }
    }
}

impl HttpStub {
    pub fn builder() -> HttpStubBuilder {
        HttpStubBuilder::default()
    }

    /// `http://127.0.0.1:<port>`
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Request targets in arrival order
    pub fn targets(&self) -> Vec<String> {
        self.targets.lock().unwrap().clone()
    }
}

impl Drop for HttpStub {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn serve(mut stream: TcpStream, routes: &[Route], seen: &Mutex<Vec<String>>) {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
    }

    let head = String::from_utf8_lossy(&request);
    let target = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("")
        .to_string();
    seen.lock().unwrap().push(target.clone());

    let (status, body) = routes
        .iter()
        .find(|r| target.starts_with(&r.prefix))
        .map(|r| (r.status, r.body.as_str()))
        .unwrap_or((404, ""));

    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        if status < 400 { "OK" } else { "Error" },
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}

/// Base URL with nothing listening behind it
pub async fn closed_base_url() -> String {
    bypass_proxy_for_loopback();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

// Clients read proxy settings when built, which happens after this runs
fn bypass_proxy_for_loopback() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    std::env::set_var("no_proxy", "127.0.0.1,localhost");
}
