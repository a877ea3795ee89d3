//! # relay-core
//!
//! Domain layer containing entities, repository traits, and domain errors.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;

// Re-export commonly used types at crate root
pub use entities::{
    ChatRoom, Message, MessageReaction, Notification, NotificationKind, Organization,
    ReadReceipt, RoomMembership, User, UserRole,
};
pub use error::DomainError;
pub use traits::{
    MembershipRepository, MessageRepository, NotificationRepository, ReactionRepository,
    RepoResult, RoomRepository, UserRepository,
};
