//! Organization entity - tenant scope for all access checks

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Organization entity. Immutable as far as the gateway is concerned;
/// it only exists to scope users and rooms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Organization {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Organization {
    pub fn new(id: Uuid, name: String) -> Self {
        Self {
            id,
            name,
            created_at: Utc::now(),
        }
    }
}
