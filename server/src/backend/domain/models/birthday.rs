use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Domain model for a tracked birthday.
///
/// The `birthdate` year is the historical birth year; only month and day
/// drive the annual recurrence. `notified` records whether the current
/// cycle's upcoming-window alert has already been sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Birthday {
    pub id: String,
    pub name: String,
    pub birthdate: NaiveDate,
    pub message: Option<String>,
    pub group_id: String,
    pub notified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Birthday {
    /// Generate a unique ID for a birthday
    pub fn generate_id(timestamp_millis: u64) -> String {
        format!("birthday::{}", timestamp_millis)
    }
}
