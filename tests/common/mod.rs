//! Minimal HTTP/1.1 stub used by the integration tests.
#![allow(dead_code)]

use api_finder::function::report::{ProbeResult, Tier};
use api_finder::function::sink::ReportSink;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

#[derive(Debug, Clone, Copy)]
pub enum Reply {
    Status(u16),
    /// Read the request and never answer.
    Hang,
    /// Close the socket without writing anything.
    Drop,
}

#[derive(Default)]
struct Counters {
    hits: AtomicUsize,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

pub struct StubServer {
    addr: SocketAddr,
    counters: Arc<Counters>,
}

impl StubServer {
    /// Paths are given without the leading slash; anything unlisted is a 404.
    pub async fn start(routes: &[(&str, Reply)], delay: Duration) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let counters = Arc::new(Counters::default());
        let routes: Arc<HashMap<String, Reply>> = Arc::new(
            routes
                .iter()
                .map(|(path, reply)| (format!("/{}", path), *reply))
                .collect(),
        );

        let shared = Arc::clone(&counters);
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let routes = Arc::clone(&routes);
                let counters = Arc::clone(&shared);
                tokio::spawn(handle(stream, routes, counters, delay));
            }
        });

        StubServer { addr, counters }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn hits(&self) -> usize {
        self.counters.hits.load(Ordering::SeqCst)
    }

    pub fn peak_in_flight(&self) -> usize {
        self.counters.peak.load(Ordering::SeqCst)
    }
}

async fn handle(
    mut stream: TcpStream,
    routes: Arc<HashMap<String, Reply>>,
    counters: Arc<Counters>,
    delay: Duration,
) {
    let Some(path) = read_request_path(&mut stream).await else {
        return;
    };

    counters.hits.fetch_add(1, Ordering::SeqCst);
    let now = counters.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    counters.peak.fetch_max(now, Ordering::SeqCst);

    tokio::time::sleep(delay).await;

    match routes.get(&path).copied().unwrap_or(Reply::Status(404)) {
        Reply::Status(code) => {
            // released before the client can see the answer and send its next request
            counters.in_flight.fetch_sub(1, Ordering::SeqCst);
            let response = format!(
                "HTTP/1.1 {} Stub\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                code
            );
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
        Reply::Hang => {
            tokio::time::sleep(Duration::from_secs(60)).await;
            counters.in_flight.fetch_sub(1, Ordering::SeqCst);
        }
        Reply::Drop => {
            counters.in_flight.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

async fn read_request_path(stream: &mut TcpStream) -> Option<String> {
    let mut buf = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let head = String::from_utf8_lossy(&buf);
    let request_line = head.lines().next()?;
    request_line.split_whitespace().nth(1).map(str::to_string)
}

/// Address that refuses connections: bound once, then released.
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// Keeps every event so tests can check what the coordinator reported.
#[derive(Default)]
pub struct CollectingSink {
    events: Mutex<Vec<(String, Tier)>>,
    finished: AtomicUsize,
}

impl CollectingSink {
    pub fn events(&self) -> Vec<(String, Tier)> {
        self.events.lock().unwrap().clone()
    }

    pub fn tier_of(&self, candidate: &str) -> Option<Tier> {
        self.events()
            .into_iter()
            .find(|(c, _)| c == candidate)
            .map(|(_, tier)| tier)
    }

    pub fn finished(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }
}

impl ReportSink for CollectingSink {
    fn record(&self, result: &ProbeResult, tier: Tier) {
        self.events
            .lock()
            .unwrap()
            .push((result.candidate.clone(), tier));
    }

    fn finish(&self) {
        self.finished.fetch_add(1, Ordering::SeqCst);
    }
}
