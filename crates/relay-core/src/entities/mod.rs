//! Domain entities - core business objects

mod message;
mod notification;
mod organization;
mod reaction;
mod room;
mod user;

pub use message::{Message, ReadReceipt};
pub use notification::{Notification, NotificationKind};
pub use organization::Organization;
pub use reaction::MessageReaction;
pub use room::{ChatRoom, RoomMembership};
pub use user::{User, UserRole};
