//! Connection tracking
//!
//! One [`Connection`] per socket and a process-wide [`SessionRegistry`]
//! mapping users and rooms to live connections.

mod registry;
mod socket;

pub use registry::SessionRegistry;
pub use socket::Connection;
