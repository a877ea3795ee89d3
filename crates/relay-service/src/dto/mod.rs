//! Data transfer objects for wire responses

mod responses;

pub use responses::{MessageDto, NotificationDto, ReactionDto, RoomDto};
