//! Live WebSocket connections keyed by raw instance string.
//!
//! Each socket task owns an outbound queue; the registry keeps the sending
//! half so the server can push to a connection it is not currently
//! answering (shutdown close frames).

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use sdui_types::Command;
use tokio::sync::{mpsc, RwLock};
use tracing::debug;

/// Close code sent to every socket on shutdown ("going away").
pub const CLOSE_GOING_AWAY: u16 = 1001;
pub const CLOSE_REASON_SHUTDOWN: &str = "Server shutting down";

/// Message queued for a socket's writer task.
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    Commands(Vec<Command>),
    Close { code: u16, reason: String },
}

pub type OutboundSender = mpsc::Sender<Outbound>;

#[derive(Debug)]
struct Registration {
    id: u64,
    sender: OutboundSender,
}

/// Registering a second socket for an instance replaces the first.
#[derive(Debug, Clone, Default)]
pub struct ConnectionRegistry {
    connections: Arc<RwLock<HashMap<String, Registration>>>,
    next_id: Arc<AtomicU64>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `sender` for `instance`; returns the connection id to
    /// deregister with.
    pub async fn register(&self, instance: &str, sender: OutboundSender) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let previous = self
            .connections
            .write()
            .await
            .insert(instance.to_string(), Registration { id, sender });
        if previous.is_some() {
            debug!("Replaced connection for instance '{}'", instance);
        }
        id
    }

    /// Remove the registration, unless a newer socket has replaced it.
    pub async fn deregister(&self, instance: &str, id: u64) -> bool {
        let mut connections = self.connections.write().await;
        match connections.get(instance) {
            Some(registration) if registration.id == id => {
                connections.remove(instance);
                true
            }
            _ => false,
        }
    }

    /// Queue commands for the socket registered under `instance`.
    pub async fn push(&self, instance: &str, commands: Vec<Command>) -> bool {
        let sender = match self.connections.read().await.get(instance) {
            Some(registration) => registration.sender.clone(),
            None => return false,
        };
        sender.send(Outbound::Commands(commands)).await.is_ok()
    }

    /// Send a shutdown close frame to every registered socket.
    pub async fn close_all(&self) -> usize {
        let senders: Vec<OutboundSender> = self
            .connections
            .read()
            .await
            .values()
            .map(|r| r.sender.clone())
            .collect();

        let mut closed = 0;
        for sender in senders {
            let close = Outbound::Close {
                code: CLOSE_GOING_AWAY,
                reason: CLOSE_REASON_SHUTDOWN.to_string(),
            };
            if sender.send(close).await.is_ok() {
                closed += 1;
            }
        }
        closed
    }

    pub async fn len(&self) -> usize {
        self.connections.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.connections.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_register_push_deregister() {
        let registry = ConnectionRegistry::new();
        let (tx, mut rx) = mpsc::channel(4);
        let id = registry.register("s1:default", tx).await;

        assert!(registry.push("s1:default", vec![Command::ClearPanel]).await);
        assert_eq!(rx.recv().await, Some(Outbound::Commands(vec![Command::ClearPanel])));

        assert!(registry.deregister("s1:default", id).await);
        assert!(registry.is_empty().await);
        assert!(!registry.push("s1:default", vec![]).await);
    }

    #[tokio::test]
    async fn test_stale_deregister_keeps_replacement() {
        let registry = ConnectionRegistry::new();
        let (old_tx, _old_rx) = mpsc::channel(1);
        let (new_tx, _new_rx) = mpsc::channel(1);
        let old = registry.register("s1", old_tx).await;
        let new = registry.register("s1", new_tx).await;

        assert!(!registry.deregister("s1", old).await);
        assert_eq!(registry.len().await, 1);
        assert!(registry.deregister("s1", new).await);
    }

    #[tokio::test]
    async fn test_close_all_sends_going_away() {
        let registry = ConnectionRegistry::new();
        let (tx, mut rx) = mpsc::channel(1);
        registry.register("s1", tx).await;

        assert_eq!(registry.close_all().await, 1);
        assert_eq!(
            rx.recv().await,
            Some(Outbound::Close {
                code: 1001,
                reason: "Server shutting down".into()
            })
        );
    }
}
