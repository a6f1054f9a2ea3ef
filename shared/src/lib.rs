use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Birthday ID in format: "birthday::epoch_millis"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Birthday {
    pub id: String,
    /// Name of the person being celebrated (max 100 characters)
    pub name: String,
    /// Calendar date of birth; only month/day drive the annual recurrence
    pub birthdate: NaiveDate,
    /// Optional free-text message shown alongside the birthday
    pub message: Option<String>,
    /// ID of the group this birthday belongs to
    pub group_id: String,
    /// Whether the current cycle's upcoming-birthday alert was already sent
    pub notified: bool,
}

/// A birthday decorated with proximity data for list views.
///
/// Entries are always returned in ascending `days_until` order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpcomingBirthday {
    pub id: String,
    pub name: String,
    pub birthdate: NaiveDate,
    pub message: Option<String>,
    pub group_id: String,
    /// Days until the next occurrence of this birthday (0 = today)
    pub days_until: i64,
    /// Presentation label, e.g. "4 June (in 3 days)"
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateBirthdayRequest {
    pub name: String,
    /// Birthdate as ISO 8601 (YYYY-MM-DD)
    pub birthdate: String,
    pub message: Option<String>,
    pub group_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateBirthdayRequest {
    pub name: Option<String>,
    /// Birthdate as ISO 8601 (YYYY-MM-DD)
    pub birthdate: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BirthdayListResponse {
    pub birthdays: Vec<Birthday>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpcomingBirthdaysResponse {
    pub birthdays: Vec<UpcomingBirthday>,
}

/// Group ID in format: "group::epoch_millis"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateGroupRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateGroupRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupListResponse {
    pub groups: Vec<Group>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteGroupResponse {
    /// Number of birthdays removed together with the group
    pub deleted_birthdays: usize,
    /// Number of members detached from the group
    pub detached_members: usize,
    pub success_message: String,
}

/// Role of a user within the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
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

/// User ID in format: "user::epoch_millis"
///
/// Credential material is handled by the authentication collaborator and
/// never travels through this API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub role: UserRole,
    /// Group membership; members of a group receive its birthday alerts
    pub group_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    pub email: String,
    pub role: UserRole,
    pub group_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddMemberRequest {
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMembersResponse {
    pub members: Vec<User>,
}
