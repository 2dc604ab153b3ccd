//! Shared utilities for relay integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use cors_relay::config::RelayConfig;
use cors_relay::{HttpServer, Shutdown};
use reqwest::StatusCode;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Canned response served by a mock upstream.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub content_type: Option<&'static str>,
    pub body: String,
    pub delay: Duration,
}

impl Reply {
    pub fn ok(content_type: &'static str, body: &str) -> Self {
        Self {
            status: 200,
            content_type: Some(content_type),
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            content_type: Some("text/plain"),
            body: "upstream error".to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn without_content_type(mut self) -> Self {
        self.content_type = None;
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// A raw-TCP HTTP/1.1 server that records every request it receives.
pub struct MockUpstream {
    pub addr: SocketAddr,
    hits: Arc<AtomicU32>,
    targets: Arc<Mutex<Vec<String>>>,
}

impl MockUpstream {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Number of requests received so far.
    pub fn hits(&self) -> u32 {
        self.hits.load(Ordering::SeqCst)
    }

    /// Request-targets (path and query) in arrival order.
    pub fn targets(&self) -> Vec<String> {
        self.targets.lock().unwrap().clone()
    }
}

/// Start a mock upstream on an ephemeral port answering every request with `reply`.
pub async fn start_upstream(reply: Reply) -> MockUpstream {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicU32::new(0));
    let targets = Arc::new(Mutex::new(Vec::new()));

    let (h, t) = (hits.clone(), targets.clone());
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let reply = reply.clone();
            let (h, t) = (h.clone(), t.clone());
            tokio::spawn(async move {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut chunk).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => buf.extend_from_slice(&chunk[..n]),
                    }
                }

                let head = String::from_utf8_lossy(&buf);
                let target = head
                    .lines()
                    .next()
                    .and_then(|line| line.split(' ').nth(1))
                    .unwrap_or_default()
                    .to_string();
                t.lock().unwrap().push(target);
                h.fetch_add(1, Ordering::SeqCst);

                tokio::time::sleep(reply.delay).await;

                let status = StatusCode::from_u16(reply.status).unwrap();
                let mut response = format!(
                    "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown"),
                    reply.body.len()
                );
                if let Some(content_type) = reply.content_type {
                    response.push_str(&format!("Content-Type: {}\r\n", content_type));
                }
                response.push_str("\r\n");
                response.push_str(&reply.body);

                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    MockUpstream {
        addr,
        hits,
        targets,
    }
}

/// Config with short timeouts, no credentials and no system proxy.
pub fn test_config(proxy_pool: Vec<String>) -> RelayConfig {
    let mut config = RelayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.relay.proxy_pool = proxy_pool;
    config.relay.credentials.clear();
    config.relay.use_system_proxy = false;
    config.timeouts.direct_ms = 500;
    config.timeouts.pool_ms = 500;
    config.timeouts.last_resort_ms = 500;
    config
}

/// Start the relay on an ephemeral port.
pub async fn start_relay(config: RelayConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// Client that never routes through an environment proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .pool_max_idle_per_host(0)
        .build()
        .unwrap()
}

/// Call `GET /api/proxy?url=<target>` on the relay.
pub async fn relay_get(relay: SocketAddr, target: &str) -> reqwest::Response {
    client()
        .get(format!("http://{}/api/proxy", relay))
        .query(&[("url", target)])
        .send()
        .await
        .expect("relay unreachable")
}
