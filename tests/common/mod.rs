//! Shared utilities for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use light_node::node::{NodeError, NodeResult};
use light_node::UnitOfWork;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::time::Instant;

/// Well-known test private key (Anvil's first account).
pub const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// Unit of work that records when it was invoked.
#[derive(Default)]
pub struct RecordingUnit {
    pub fail: bool,
    calls: AtomicU64,
    at: Mutex<Vec<Instant>>,
}

impl RecordingUnit {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn invoked_at(&self) -> Vec<Instant> {
        self.at.lock().unwrap().clone()
    }
}

#[async_trait]
impl UnitOfWork for RecordingUnit {
    async fn run_once(&self) -> NodeResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.at.lock().unwrap().push(Instant::now());
        if self.fail {
            return Err(NodeError::Collect("simulated failure".to_string()));
        }
        Ok(())
    }
}

/// Start a simple mock backend that returns a fixed status and body.
///
/// Returns the bound address.
pub async fn start_mock_backend(status: u16, body: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let mut buf = [0u8; 1024];
                        let _ = socket.read(&mut buf).await;
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            503 => "503 Service Unavailable",
                            _ => "500 Internal Server Error",
                        };
                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}
