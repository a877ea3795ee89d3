//! Entity <-> model mappers

mod membership;
mod message;
mod notification;
mod reaction;
mod room;
mod user;
