//! # relay-service
//!
//! Application layer containing business logic, services, and DTOs.

pub mod dto;
pub mod services;

pub use dto::{MessageDto, NotificationDto, ReactionDto, RoomDto};
pub use services::{
    AccessService, ChatService, NotificationService, PresenceService, ReactionService,
    RoomService, ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult,
};
