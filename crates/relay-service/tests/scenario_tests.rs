//! Service-level scenario tests over in-memory fake repositories.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use uuid::Uuid;

use relay_common::MessageCipher;
use relay_core::entities::{
    ChatRoom, Message, MessageReaction, Notification, NotificationKind, RoomMembership, User,
    UserRole,
};
use relay_core::traits::{
    MembershipRepository, MessageRepository, NotificationRepository, ReactionRepository,
    RepoResult, RoomRepository, UserRepository,
};
use relay_service::services::{
    ChatService, NotificationService, ReactionService, RoomService, ServiceContext,
    ServiceContextBuilder,
};

type UserMap = Arc<Mutex<HashMap<Uuid, User>>>;

#[derive(Default)]
struct FakeUserRepo {
    users: UserMap,
}

#[async_trait]
impl UserRepository for FakeUserRepo {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<User>> {
        Ok(self.users.lock().get(&id).cloned())
    }

    async fn find_by_organization(&self, organization_id: Uuid) -> RepoResult<Vec<User>> {
        Ok(self
            .users
            .lock()
            .values()
            .filter(|u| u.organization_id == organization_id)
            .cloned()
            .collect())
    }

    async fn set_presence(
        &self,
        id: Uuid,
        is_online: bool,
        last_seen: DateTime<Utc>,
    ) -> RepoResult<()> {
        if let Some(user) = self.users.lock().get_mut(&id) {
            user.is_online = is_online;
            user.last_seen = Some(last_seen);
        }
        Ok(())
    }
}

#[derive(Default)]
struct FakeRoomRepo {
    rooms: Mutex<HashMap<Uuid, ChatRoom>>,
}

#[async_trait]
impl RoomRepository for FakeRoomRepo {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<ChatRoom>> {
        Ok(self.rooms.lock().get(&id).cloned())
    }

    async fn create(&self, room: &ChatRoom) -> RepoResult<()> {
        self.rooms.lock().insert(room.id, room.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        self.rooms.lock().remove(&id);
        Ok(())
    }
}

#[derive(Default)]
struct FakeMembershipRepo {
    rows: Mutex<Vec<RoomMembership>>,
}

#[async_trait]
impl MembershipRepository for FakeMembershipRepo {
    async fn find(&self, room_id: Uuid, user_id: Uuid) -> RepoResult<Option<RoomMembership>> {
        Ok(self
            .rows
            .lock()
            .iter()
            .find(|m| m.room_id == room_id && m.user_id == user_id)
            .cloned())
    }

    async fn find_by_room(&self, room_id: Uuid) -> RepoResult<Vec<RoomMembership>> {
        Ok(self
            .rows
            .lock()
            .iter()
            .filter(|m| m.room_id == room_id)
            .cloned()
            .collect())
    }

    async fn find_by_user(&self, user_id: Uuid) -> RepoResult<Vec<RoomMembership>> {
        Ok(self
            .rows
            .lock()
            .iter()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn is_member(&self, room_id: Uuid, user_id: Uuid) -> RepoResult<bool> {
        Ok(self.find(room_id, user_id).await?.is_some())
    }

    async fn create(&self, membership: &RoomMembership) -> RepoResult<()> {
        let mut rows = self.rows.lock();
        let exists = rows
            .iter()
            .any(|m| m.room_id == membership.room_id && m.user_id == membership.user_id);
        if !exists {
            rows.push(membership.clone());
        }
        Ok(())
    }

    async fn update_role(&self, room_id: Uuid, user_id: Uuid, role: UserRole) -> RepoResult<()> {
        if let Some(m) = self
            .rows
            .lock()
            .iter_mut()
            .find(|m| m.room_id == room_id && m.user_id == user_id)
        {
            m.role = role;
        }
        Ok(())
    }

    async fn delete(&self, room_id: Uuid, user_id: Uuid) -> RepoResult<()> {
        self.rows
            .lock()
            .retain(|m| !(m.room_id == room_id && m.user_id == user_id));
        Ok(())
    }
}

struct FakeMessageRepo {
    messages: Mutex<Vec<Message>>,
    users: UserMap,
}

impl FakeMessageRepo {
    fn new(users: UserMap) -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            users,
        }
    }
}

#[async_trait]
impl MessageRepository for FakeMessageRepo {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Message>> {
        Ok(self.messages.lock().iter().find(|m| m.id == id).cloned())
    }

    async fn find_recent_by_organization(
        &self,
        organization_id: Uuid,
        limit: i64,
    ) -> RepoResult<Vec<Message>> {
        let users = self.users.lock();
        let mut rows: Vec<Message> = self
            .messages
            .lock()
            .iter()
            .filter(|m| {
                users
                    .get(&m.sender_id)
                    .is_some_and(|u| u.organization_id == organization_id)
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(rows)
    }

    async fn create(&self, message: &Message) -> RepoResult<()> {
        self.messages.lock().push(message.clone());
        Ok(())
    }

    async fn append_read_receipt(
        &self,
        message_id: Uuid,
        user_id: Uuid,
        read_at: DateTime<Utc>,
    ) -> RepoResult<bool> {
        let mut messages = self.messages.lock();
        match messages.iter_mut().find(|m| m.id == message_id) {
            Some(message) => Ok(message.mark_read(user_id, read_at)),
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        self.messages.lock().retain(|m| m.id != id);
        Ok(())
    }
}

#[derive(Default)]
struct FakeReactionRepo {
    rows: Mutex<Vec<MessageReaction>>,
}

#[async_trait]
impl ReactionRepository for FakeReactionRepo {
    async fn find_by_message(&self, message_id: Uuid) -> RepoResult<Vec<MessageReaction>> {
        Ok(self
            .rows
            .lock()
            .iter()
            .filter(|r| r.message_id == message_id)
            .cloned()
            .collect())
    }

    async fn create(&self, reaction: &MessageReaction) -> RepoResult<()> {
        let mut rows = self.rows.lock();
        let exists = rows.iter().any(|r| {
            r.message_id == reaction.message_id
                && r.user_id == reaction.user_id
                && r.reaction == reaction.reaction
        });
        if !exists {
            rows.push(reaction.clone());
        }
        Ok(())
    }

    async fn delete(&self, message_id: Uuid, user_id: Uuid, reaction: &str) -> RepoResult<()> {
        self.rows.lock().retain(|r| {
            !(r.message_id == message_id && r.user_id == user_id && r.reaction == reaction)
        });
        Ok(())
    }
}

#[derive(Default)]
struct FakeNotificationRepo {
    rows: Mutex<Vec<Notification>>,
}

#[async_trait]
impl NotificationRepository for FakeNotificationRepo {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Notification>> {
        Ok(self.rows.lock().iter().find(|n| n.id == id).cloned())
    }

    async fn find_by_user(&self, user_id: Uuid) -> RepoResult<Vec<Notification>> {
        Ok(self
            .rows
            .lock()
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create(&self, notification: &Notification) -> RepoResult<()> {
        self.rows.lock().push(notification.clone());
        Ok(())
    }

    async fn mark_read(&self, id: Uuid) -> RepoResult<()> {
        if let Some(n) = self.rows.lock().iter_mut().find(|n| n.id == id) {
            n.is_read = true;
        }
        Ok(())
    }
}

struct Harness {
    ctx: ServiceContext,
    users: UserMap,
    message_repo: Arc<FakeMessageRepo>,
    reaction_repo: Arc<FakeReactionRepo>,
    notification_repo: Arc<FakeNotificationRepo>,
}

fn harness() -> Harness {
    let users: UserMap = Arc::default();
    let user_repo = Arc::new(FakeUserRepo {
        users: Arc::clone(&users),
    });
    let message_repo = Arc::new(FakeMessageRepo::new(Arc::clone(&users)));
    let reaction_repo = Arc::new(FakeReactionRepo::default());
    let notification_repo = Arc::new(FakeNotificationRepo::default());

    let cipher = MessageCipher::from_hex_secret(&"c".repeat(64)).unwrap();

    let ctx = ServiceContextBuilder::new()
        .user_repo(user_repo)
        .room_repo(Arc::new(FakeRoomRepo::default()))
        .membership_repo(Arc::new(FakeMembershipRepo::default()))
        .message_repo(Arc::clone(&message_repo) as Arc<dyn MessageRepository>)
        .reaction_repo(Arc::clone(&reaction_repo) as Arc<dyn ReactionRepository>)
        .notification_repo(Arc::clone(&notification_repo) as Arc<dyn NotificationRepository>)
        .cipher(Arc::new(cipher))
        .build()
        .unwrap();

    Harness {
        ctx,
        users,
        message_repo,
        reaction_repo,
        notification_repo,
    }
}

fn seed_user(h: &Harness, org: Uuid, name: &str, role: UserRole) -> User {
    let mut user = User::new(
        Uuid::new_v4(),
        format!("{name}@example.com"),
        name.to_string(),
        org,
    );
    user.role = role;
    h.users.lock().insert(user.id, user.clone());
    user
}

#[tokio::test]
async fn direct_message_same_org_is_persisted_encrypted() {
    let h = harness();
    let org = Uuid::new_v4();
    let x = seed_user(&h, org, "x", UserRole::User);
    let y = seed_user(&h, org, "y", UserRole::User);

    let chat = ChatService::new(&h.ctx);
    let outcome = chat.send_direct(x.id, y.id, "hi").await.unwrap();

    assert_eq!(outcome.message.content, "hi");
    assert_eq!(outcome.recipient.id, y.id);
    assert!(outcome.message.read_by.is_empty());

    let stored = &h.message_repo.messages.lock()[0];
    assert!(stored.is_encrypted);
    assert_ne!(stored.content, "hi");
    assert!(stored.content.contains(':'));
    assert!(stored.read_by.is_empty());
}

#[tokio::test]
async fn direct_message_cross_org_is_rejected_without_persisting() {
    let h = harness();
    let x = seed_user(&h, Uuid::new_v4(), "x", UserRole::User);
    let z = seed_user(&h, Uuid::new_v4(), "z", UserRole::User);

    let chat = ChatService::new(&h.ctx);
    let err = chat.send_direct(x.id, z.id, "hi").await.unwrap_err();

    assert!(err.is_access_denied());
    assert!(h.message_repo.messages.lock().is_empty());
}

#[tokio::test]
async fn create_room_assigns_roles_and_notifies_non_creators() {
    let h = harness();
    let org = Uuid::new_v4();
    let a = seed_user(&h, org, "a", UserRole::Admin);
    let b = seed_user(&h, org, "b", UserRole::User);
    let c = seed_user(&h, org, "c", UserRole::User);

    let rooms = RoomService::new(&h.ctx);
    let created = rooms
        .create_room(&a, "general", false, &[a.id, b.id, c.id])
        .await
        .unwrap();

    let role_of = |user: Uuid| {
        created
            .memberships
            .iter()
            .find(|m| m.user_id == user)
            .map(|m| m.role)
    };
    assert_eq!(role_of(a.id), Some(UserRole::Moderator));
    assert_eq!(role_of(b.id), Some(UserRole::User));
    assert_eq!(role_of(c.id), Some(UserRole::User));

    let notes = h.notification_repo.rows.lock();
    assert!(notes.iter().all(|n| n.kind == NotificationKind::NewRoom));
    assert!(notes.iter().any(|n| n.user_id == b.id));
    assert!(notes.iter().any(|n| n.user_id == c.id));
    assert!(!notes.iter().any(|n| n.user_id == a.id));
}

#[tokio::test]
async fn room_message_delete_requires_moderation() {
    let h = harness();
    let org = Uuid::new_v4();
    let a = seed_user(&h, org, "a", UserRole::User);
    let b = seed_user(&h, org, "b", UserRole::User);

    let rooms = RoomService::new(&h.ctx);
    let created = rooms
        .create_room(&a, "general", false, &[b.id])
        .await
        .unwrap();

    let chat = ChatService::new(&h.ctx);
    let sent = chat
        .send_to_room(b.id, created.room.id, "delete me")
        .await
        .unwrap();

    // Non-moderator rejected, message untouched
    let err = chat
        .delete_room_message(&b, created.room.id, sent.message.id)
        .await
        .unwrap_err();
    assert!(err.is_access_denied());
    assert_eq!(h.message_repo.messages.lock().len(), 1);

    // Room moderator succeeds
    chat.delete_room_message(&a, created.room.id, sent.message.id)
        .await
        .unwrap();
    assert!(h.message_repo.messages.lock().is_empty());
}

#[tokio::test]
async fn mark_read_is_idempotent() {
    let h = harness();
    let org = Uuid::new_v4();
    let x = seed_user(&h, org, "x", UserRole::User);
    let y = seed_user(&h, org, "y", UserRole::User);

    let chat = ChatService::new(&h.ctx);
    let sent = chat.send_direct(x.id, y.id, "hi").await.unwrap();

    let first = chat.mark_read(y.id, sent.message.id).await.unwrap();
    assert!(first.newly_read);

    let second = chat.mark_read(y.id, sent.message.id).await.unwrap();
    assert!(!second.newly_read);

    let stored = h
        .message_repo
        .find_by_id(sent.message.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.read_by.len(), 1);
}

#[tokio::test]
async fn room_read_with_mismatched_room_leaves_receipts_untouched() {
    let h = harness();
    let org = Uuid::new_v4();
    let a = seed_user(&h, org, "a", UserRole::User);
    let b = seed_user(&h, org, "b", UserRole::User);

    let rooms = RoomService::new(&h.ctx);
    let created = rooms
        .create_room(&a, "general", false, &[b.id])
        .await
        .unwrap();

    let chat = ChatService::new(&h.ctx);
    let sent = chat
        .send_to_room(a.id, created.room.id, "hello room")
        .await
        .unwrap();

    // Wrong room id is rejected before any receipt is written
    let err = chat
        .mark_read_in_room(b.id, sent.message.id, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    let stored = h
        .message_repo
        .find_by_id(sent.message.id)
        .await
        .unwrap()
        .unwrap();
    assert!(stored.read_by.is_empty());

    // The matching room id still works
    let outcome = chat
        .mark_read_in_room(b.id, sent.message.id, created.room.id)
        .await
        .unwrap();
    assert!(outcome.newly_read);
}

#[tokio::test]
async fn reactions_are_idempotent() {
    let h = harness();
    let org = Uuid::new_v4();
    let x = seed_user(&h, org, "x", UserRole::User);
    let y = seed_user(&h, org, "y", UserRole::User);

    let chat = ChatService::new(&h.ctx);
    let sent = chat.send_direct(x.id, y.id, "hi").await.unwrap();

    let reactions = ReactionService::new(&h.ctx);
    reactions
        .add_reaction(y.id, sent.message.id, "👍")
        .await
        .unwrap();
    reactions
        .add_reaction(y.id, sent.message.id, "👍")
        .await
        .unwrap();
    assert_eq!(h.reaction_repo.rows.lock().len(), 1);

    reactions
        .remove_reaction(y.id, sent.message.id, "👍")
        .await
        .unwrap();
    reactions
        .remove_reaction(y.id, sent.message.id, "👍")
        .await
        .unwrap();
    assert!(h.reaction_repo.rows.lock().is_empty());
}

#[tokio::test]
async fn assign_moderator_rejects_existing_moderator() {
    let h = harness();
    let org = Uuid::new_v4();
    let a = seed_user(&h, org, "a", UserRole::User);
    let b = seed_user(&h, org, "b", UserRole::User);

    let rooms = RoomService::new(&h.ctx);
    let created = rooms
        .create_room(&a, "general", false, &[b.id])
        .await
        .unwrap();

    let promoted = rooms
        .assign_moderator(&a, created.room.id, b.id)
        .await
        .unwrap();
    assert_eq!(promoted.role, UserRole::Moderator);

    let notes = h.notification_repo.rows.lock();
    assert!(notes
        .iter()
        .any(|n| n.user_id == b.id && n.kind == NotificationKind::RoleChanged));
    drop(notes);

    let err = rooms
        .assign_moderator(&a, created.room.id, b.id)
        .await
        .unwrap_err();
    assert!(err.is_conflict());
}

#[tokio::test]
async fn notification_read_requires_ownership() {
    let h = harness();
    let org = Uuid::new_v4();
    let a = seed_user(&h, org, "a", UserRole::Admin);
    let b = seed_user(&h, org, "b", UserRole::User);
    let c = seed_user(&h, org, "c", UserRole::User);

    let rooms = RoomService::new(&h.ctx);
    rooms.create_room(&a, "general", false, &[b.id]).await.unwrap();

    let notifications = NotificationService::new(&h.ctx);
    let inbox = notifications.list(b.id).await.unwrap();
    let target = inbox[0].id;

    // A different user cannot mark it read
    let err = notifications.mark_as_read(c.id, target).await.unwrap_err();
    assert!(err.is_not_found());

    let read = notifications.mark_as_read(b.id, target).await.unwrap();
    assert!(read.is_read);
}

#[tokio::test]
async fn recent_messages_are_scoped_and_decrypted() {
    let h = harness();
    let org1 = Uuid::new_v4();
    let org2 = Uuid::new_v4();
    let x = seed_user(&h, org1, "x", UserRole::User);
    let y = seed_user(&h, org1, "y", UserRole::User);
    let z = seed_user(&h, org2, "z", UserRole::User);
    let w = seed_user(&h, org2, "w", UserRole::User);

    let chat = ChatService::new(&h.ctx);
    chat.send_direct(x.id, y.id, "inside").await.unwrap();
    chat.send_direct(z.id, w.id, "outside").await.unwrap();

    let snapshot = chat.recent_messages(&y, 100).await.unwrap();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].content, "inside");
}
