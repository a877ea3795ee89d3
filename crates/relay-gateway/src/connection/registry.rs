//! Session registry
//!
//! Tracks live connections, the user → connection mapping, and room
//! subscriptions. All maps are `DashMap`s so mutations are atomic per entry.

use crate::connection::Connection;
use crate::protocol::ServerEvent;
use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

/// Process-wide registry of live connections
///
/// A user has at most one live mapping: registering a second connection for
/// the same user supersedes the first (last wins). The superseded socket
/// stays open until its own tasks exit, but it no longer receives
/// user-addressed events and its unregister does not touch the mapping.
pub struct SessionRegistry {
    /// connection_id -> connection
    connections: DashMap<String, Arc<Connection>>,

    /// user_id -> live connection_id
    sessions: DashMap<Uuid, String>,

    /// room_id -> subscribed connection_ids
    rooms: DashMap<Uuid, HashSet<String>>,
}

impl SessionRegistry {
    /// Create a new registry
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
            sessions: DashMap::new(),
            rooms: DashMap::new(),
        }
    }

    /// Create a new registry wrapped in Arc
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Register a connection as the user's live one
    ///
    /// Returns the superseded connection, if there was one.
    pub fn register(&self, connection: Arc<Connection>) -> Option<Arc<Connection>> {
        let user_id = connection.user_id();
        let id = connection.id().to_string();

        self.connections.insert(id.clone(), connection);
        let superseded = self.sessions.insert(user_id, id)?;
        self.connections.get(&superseded).map(|e| e.value().clone())
    }

    /// Remove a connection and its room subscriptions
    ///
    /// Returns true when the connection was still the user's live one; a
    /// superseded connection leaves the user mapping untouched.
    pub fn unregister(&self, connection_id: &str) -> bool {
        let removed = self.connections.remove(connection_id);

        for mut entry in self.rooms.iter_mut() {
            entry.value_mut().remove(connection_id);
        }
        self.rooms.retain(|_, ids| !ids.is_empty());

        match removed {
            Some((_, connection)) => self
                .sessions
                .remove_if(&connection.user_id(), |_, id| id == connection_id)
                .is_some(),
            None => false,
        }
    }

    /// Look up a user's live connection; an offline user is `None`
    pub fn resolve(&self, user_id: Uuid) -> Option<Arc<Connection>> {
        let id = self.sessions.get(&user_id)?.value().clone();
        self.connections.get(&id).map(|e| e.value().clone())
    }

    /// Check whether a user has a live connection
    pub fn is_online(&self, user_id: Uuid) -> bool {
        self.sessions.contains_key(&user_id)
    }

    /// Subscribe a connection to a room's broadcasts
    pub fn subscribe_room(&self, room_id: Uuid, connection_id: &str) {
        self.rooms
            .entry(room_id)
            .or_default()
            .insert(connection_id.to_string());
    }

    /// Unsubscribe a connection from a room
    pub fn unsubscribe_room(&self, room_id: Uuid, connection_id: &str) {
        self.rooms.alter(&room_id, |_, mut ids| {
            ids.remove(connection_id);
            ids
        });
        self.rooms.remove_if(&room_id, |_, ids| ids.is_empty());
    }

    /// Drop a room's entire subscription set (room deleted)
    pub fn drop_room(&self, room_id: Uuid) {
        self.rooms.remove(&room_id);
    }

    /// Check whether a user's live connection is subscribed to a room
    pub fn is_viewing_room(&self, user_id: Uuid, room_id: Uuid) -> bool {
        let Some(connection) = self.resolve(user_id) else {
            return false;
        };
        self.rooms
            .get(&room_id)
            .is_some_and(|ids| ids.contains(connection.id()))
    }

    /// Send an event to every connection subscribed to a room
    ///
    /// Returns the number of connections the event was handed to.
    pub fn send_to_room(
        &self,
        room_id: Uuid,
        event: &ServerEvent,
        exclude_user: Option<Uuid>,
    ) -> usize {
        let Some(ids) = self.rooms.get(&room_id).map(|e| e.value().clone()) else {
            return 0;
        };

        let mut sent = 0;
        for id in ids {
            let Some(connection) = self.connections.get(&id).map(|e| e.value().clone()) else {
                continue;
            };
            if exclude_user == Some(connection.user_id()) {
                continue;
            }
            if connection.try_send(event.clone()).is_ok() {
                sent += 1;
            }
        }
        sent
    }

    /// Send an event to every live connection
    pub fn broadcast(&self, event: &ServerEvent, exclude_user: Option<Uuid>) -> usize {
        let mut sent = 0;
        for entry in self.connections.iter() {
            let connection = entry.value();
            if exclude_user == Some(connection.user_id()) {
                continue;
            }
            if connection.try_send(event.clone()).is_ok() {
                sent += 1;
            }
        }
        sent
    }

    /// Number of live connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Number of distinct online users
    pub fn online_count(&self) -> usize {
        self.sessions.len()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("connections", &self.connections.len())
            .field("sessions", &self.sessions.len())
            .field("rooms", &self.rooms.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{PresencePayload, ServerEvent};
    use relay_core::entities::User;
    use tokio::sync::mpsc;

    fn test_user(org: Uuid) -> User {
        User::new(
            Uuid::new_v4(),
            format!("{}@example.com", Uuid::new_v4()),
            "user".to_string(),
            org,
        )
    }

    fn connect(
        registry: &SessionRegistry,
        user: &User,
    ) -> (Arc<Connection>, mpsc::Receiver<ServerEvent>) {
        let (tx, rx) = mpsc::channel(10);
        let conn = Connection::new(user.clone(), tx);
        registry.register(conn.clone());
        (conn, rx)
    }

    fn ping(user_id: Uuid) -> ServerEvent {
        ServerEvent::UserOnline(PresencePayload { user_id })
    }

    #[tokio::test]
    async fn test_register_and_resolve() {
        let registry = SessionRegistry::new();
        let user = test_user(Uuid::new_v4());

        assert!(registry.resolve(user.id).is_none());

        let (conn, _rx) = connect(&registry, &user);
        let resolved = registry.resolve(user.id).unwrap();
        assert_eq!(resolved.id(), conn.id());
        assert!(registry.is_online(user.id));
    }

    #[tokio::test]
    async fn test_second_connection_supersedes_first() {
        let registry = SessionRegistry::new();
        let user = test_user(Uuid::new_v4());

        let (first, _rx1) = connect(&registry, &user);
        let (second, _rx2) = connect(&registry, &user);

        assert_eq!(registry.resolve(user.id).unwrap().id(), second.id());

        // The superseded connection's cleanup must not evict the live one
        assert!(!registry.unregister(first.id()));
        assert_eq!(registry.resolve(user.id).unwrap().id(), second.id());

        assert!(registry.unregister(second.id()));
        assert!(registry.resolve(user.id).is_none());
    }

    #[tokio::test]
    async fn test_unregister_clears_room_subscriptions() {
        let registry = SessionRegistry::new();
        let user = test_user(Uuid::new_v4());
        let room = Uuid::new_v4();

        let (conn, _rx) = connect(&registry, &user);
        registry.subscribe_room(room, conn.id());
        assert!(registry.is_viewing_room(user.id, room));

        registry.unregister(conn.id());
        assert!(!registry.is_viewing_room(user.id, room));
        assert_eq!(registry.send_to_room(room, &ping(user.id), None), 0);
    }

    #[tokio::test]
    async fn test_send_to_room_excludes_sender() {
        let registry = SessionRegistry::new();
        let org = Uuid::new_v4();
        let alice = test_user(org);
        let bob = test_user(org);
        let room = Uuid::new_v4();

        let (alice_conn, mut alice_rx) = connect(&registry, &alice);
        let (bob_conn, mut bob_rx) = connect(&registry, &bob);
        registry.subscribe_room(room, alice_conn.id());
        registry.subscribe_room(room, bob_conn.id());

        let sent = registry.send_to_room(room, &ping(alice.id), Some(alice.id));
        assert_eq!(sent, 1);

        assert!(bob_rx.try_recv().is_ok());
        assert!(alice_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_unsubscribe_room() {
        let registry = SessionRegistry::new();
        let user = test_user(Uuid::new_v4());
        let room = Uuid::new_v4();

        let (conn, _rx) = connect(&registry, &user);
        registry.subscribe_room(room, conn.id());
        registry.unsubscribe_room(room, conn.id());

        assert!(!registry.is_viewing_room(user.id, room));
    }

    #[tokio::test]
    async fn test_broadcast_reaches_all_but_excluded() {
        let registry = SessionRegistry::new();
        let org = Uuid::new_v4();
        let alice = test_user(org);
        let bob = test_user(org);

        let (_a, mut alice_rx) = connect(&registry, &alice);
        let (_b, mut bob_rx) = connect(&registry, &bob);

        let sent = registry.broadcast(&ping(alice.id), Some(alice.id));
        assert_eq!(sent, 1);
        assert!(bob_rx.try_recv().is_ok());
        assert!(alice_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_broadcast_without_exclusion_includes_subject() {
        let registry = SessionRegistry::new();
        let org = Uuid::new_v4();
        let alice = test_user(org);
        let bob = test_user(org);

        let (_a, mut alice_rx) = connect(&registry, &alice);
        let (_b, mut bob_rx) = connect(&registry, &bob);

        // Presence events go to every connection, the subject's included
        let sent = registry.broadcast(&ping(alice.id), None);
        assert_eq!(sent, 2);
        assert!(alice_rx.try_recv().is_ok());
        assert!(bob_rx.try_recv().is_ok());
    }
}
