use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role of a user within the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    Admin,
    GroupLeader,
    Member,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Admin => write!(f, "ADMIN"),
            UserRole::GroupLeader => write!(f, "GROUP_LEADER"),
            UserRole::Member => write!(f, "MEMBER"),
        }
    }
}

impl FromStr for UserRole {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(UserRole::Admin),
            "GROUP_LEADER" => Ok(UserRole::GroupLeader),
            "MEMBER" => Ok(UserRole::Member),
            other => Err(anyhow::anyhow!("Unknown user role: {}", other)),
        }
    }
}

/// Domain model for a registered user.
///
/// Credential material is owned by the authentication collaborator and is
/// never stored or inspected here. A user with a `group_id` receives that
/// group's birthday notifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub role: UserRole,
    pub group_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Generate a unique ID for a user
    pub fn generate_id(timestamp_millis: u64) -> String {
        format!("user::{}", timestamp_millis)
    }
}
