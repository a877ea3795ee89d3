//! Database models with SQLx FromRow derives

mod membership;
mod message;
mod notification;
mod reaction;
mod room;
mod user;

pub use membership::MembershipModel;
pub use message::MessageModel;
pub use notification::NotificationModel;
pub use reaction::ReactionModel;
pub use room::RoomModel;
pub use user::UserModel;
