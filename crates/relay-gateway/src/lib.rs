//! # relay-gateway
//!
//! WebSocket gateway for real-time bidirectional chat traffic.

pub mod connection;
pub mod handlers;
pub mod limiter;
pub mod protocol;
pub mod server;

pub use server::run;
