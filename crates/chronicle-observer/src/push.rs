//! The TCP push broadcaster.
//!
//! Consumers open a plain TCP connection and receive newline-delimited
//! JSON documents as turns complete. There is no handshake, no replay,
//! and no acknowledgment: delivery is best-effort, at most once per
//! client. A write failure drops only the failed client; the rest of the
//! registry is unaffected. The registry is unbounded, a known gap.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;

/// Registry of connected push clients, keyed by a monotonic connection id.
#[derive(Default)]
pub struct PushServer {
    clients: Mutex<HashMap<u64, TcpStream>>,
    next_id: AtomicU64,
}

impl PushServer {
    /// Create a broadcaster with no clients.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept connections forever, registering each under a fresh id.
    ///
    /// Run this on its own task; it returns only if the listener fails.
    pub async fn accept_loop(&self, listener: TcpListener) {
        loop {
            match listener.accept().await {
                Ok((stream, peer)) => {
                    let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                    tracing::info!(client_id = id, %peer, "push client connected");
                    self.clients.lock().await.insert(id, stream);
                }
                Err(error) => {
                    tracing::error!(%error, "push accept loop failed");
                    return;
                }
            }
        }
    }

    /// Send one newline-terminated message to every registered client.
    ///
    /// Clients whose write fails are removed; everyone else still gets
    /// the message.
    pub async fn broadcast(&self, message: &str) {
        let line = format!("{message}\n");
        let mut clients = self.clients.lock().await;
        let mut dropped = Vec::new();
        for (id, stream) in clients.iter_mut() {
            if let Err(error) = stream.write_all(line.as_bytes()).await {
                tracing::warn!(client_id = id, %error, "push write failed");
                dropped.push(*id);
            }
        }
        for id in dropped {
            clients.remove(&id);
            tracing::info!(client_id = id, "push client dropped");
        }
    }

    /// Number of currently registered clients.
    pub async fn client_count(&self) -> usize {
        self.clients.lock().await.len()
    }
}
