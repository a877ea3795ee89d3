//! Domain traits (ports)

mod repositories;

pub use repositories::{
    MembershipRepository, MessageRepository, NotificationRepository, ReactionRepository,
    RepoResult, RoomRepository, UserRepository,
};
