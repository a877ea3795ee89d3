//! PostgreSQL repository implementations

mod error;
mod membership;
mod message;
mod notification;
mod reaction;
mod room;
mod user;

pub use membership::PgMembershipRepository;
pub use message::PgMessageRepository;
pub use notification::PgNotificationRepository;
pub use reaction::PgReactionRepository;
pub use room::PgRoomRepository;
pub use user::PgUserRepository;
