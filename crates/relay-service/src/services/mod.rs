//! Business logic services
//!
//! This module contains all service layer implementations that handle
//! business logic, validation, and orchestration of domain operations.

pub mod access;
pub mod chat;
pub mod context;
pub mod error;
pub mod notification;
pub mod presence;
pub mod reaction;
pub mod room;

// Re-export all services for convenience
pub use access::AccessService;
pub use chat::{ChatService, DirectMessageOutcome, ReadOutcome, RoomMessageOutcome};
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use notification::NotificationService;
pub use presence::PresenceService;
pub use reaction::{ReactionOutcome, ReactionService};
pub use room::{CreatedRoom, RoomService};
