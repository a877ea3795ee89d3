//! Individual WebSocket connection
//!
//! Connections are authenticated before they are constructed, so the user
//! context is immutable for the connection's lifetime.

use crate::protocol::ServerEvent;
use relay_core::entities::User;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use uuid::Uuid;

/// A single authenticated WebSocket connection
pub struct Connection {
    /// Unique connection ID
    id: String,

    /// Authenticated user snapshot taken at handshake time
    user: User,

    /// Channel to the socket's send task
    sender: mpsc::Sender<ServerEvent>,

    /// Connection creation time
    created_at: Instant,
}

impl Connection {
    /// Create a new connection for an authenticated user
    pub fn new(user: User, sender: mpsc::Sender<ServerEvent>) -> Arc<Self> {
        Arc::new(Self {
            id: Uuid::new_v4().to_string(),
            user,
            sender,
            created_at: Instant::now(),
        })
    }

    /// Get the connection ID
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get the authenticated user ID
    pub fn user_id(&self) -> Uuid {
        self.user.id
    }

    /// Get the authenticated user snapshot
    pub fn user(&self) -> &User {
        &self.user
    }

    /// Get connection age
    pub fn age(&self) -> std::time::Duration {
        self.created_at.elapsed()
    }

    /// Send an event to this connection, waiting for channel capacity
    pub async fn send(&self, event: ServerEvent) -> Result<(), mpsc::error::SendError<ServerEvent>> {
        self.sender.send(event).await
    }

    /// Try to send an event without blocking
    ///
    /// Used for fan-out; a full or closed channel drops the event for this
    /// connection only.
    pub fn try_send(&self, event: ServerEvent) -> Result<(), mpsc::error::TrySendError<ServerEvent>> {
        self.sender.try_send(event)
    }

    /// Check if the send task is gone
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("user_id", &self.user.id)
            .field("created_at", &self.created_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{PresencePayload, ServerEvent};

    fn test_user() -> User {
        User::new(
            Uuid::new_v4(),
            "alice@example.com".to_string(),
            "alice".to_string(),
            Uuid::new_v4(),
        )
    }

    #[tokio::test]
    async fn test_connection_identity() {
        let (tx, _rx) = mpsc::channel(10);
        let user = test_user();
        let conn = Connection::new(user.clone(), tx);

        assert_eq!(conn.user_id(), user.id);
        assert!(!conn.id().is_empty());
    }

    #[tokio::test]
    async fn test_connection_send() {
        let (tx, mut rx) = mpsc::channel(10);
        let conn = Connection::new(test_user(), tx);

        let event = ServerEvent::UserOnline(PresencePayload {
            user_id: conn.user_id(),
        });
        conn.send(event).await.unwrap();

        assert!(matches!(rx.recv().await, Some(ServerEvent::UserOnline(_))));
    }

    #[tokio::test]
    async fn test_connection_closed_detection() {
        let (tx, rx) = mpsc::channel(10);
        let conn = Connection::new(test_user(), tx);

        assert!(!conn.is_closed());
        drop(rx);
        assert!(conn.is_closed());
    }
}
