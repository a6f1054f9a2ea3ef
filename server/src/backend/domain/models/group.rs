use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Domain model for a group of people who track birthdays together.
///
/// A group exclusively owns its birthdays; deleting the group deletes them.
/// Membership lives on the user side as a non-owning reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Group {
    /// Generate a unique ID for a group
    pub fn generate_id(timestamp_millis: u64) -> String {
        format!("group::{}", timestamp_millis)
    }
}
