//! Domain-level command and query types.
//!
//! These structs are used by services inside the domain layer and are **not**
//! exposed over the public API. The REST layer is responsible for mapping the
//! public DTOs defined in the `shared` crate to these internal types.

pub mod birthday {
    use chrono::NaiveDate;

    use crate::backend::domain::models::birthday::Birthday as DomainBirthday;

    /// Input for creating a new birthday.
    #[derive(Debug, Clone)]
    pub struct CreateBirthdayCommand {
        pub name: String,
        /// Birthdate as ISO 8601 (YYYY-MM-DD)
        pub birthdate: String,
        pub message: Option<String>,
        pub group_id: String,
    }

    /// Input for updating a birthday.
    #[derive(Debug, Clone)]
    pub struct UpdateBirthdayCommand {
        pub birthday_id: String,
        pub name: Option<String>,
        pub birthdate: Option<String>,
        pub message: Option<String>,
    }

    /// Query for the proximity-sorted upcoming view.
    ///
    /// `today` defaults to the process-local calendar date when absent;
    /// tests pin it for determinism.
    #[derive(Debug, Clone, Default)]
    pub struct UpcomingBirthdaysQuery {
        pub group_id: Option<String>,
        pub today: Option<NaiveDate>,
    }

    /// Query for substring search over birthday names.
    #[derive(Debug, Clone)]
    pub struct SearchBirthdaysQuery {
        pub query: String,
        pub today: Option<NaiveDate>,
    }

    /// Result of creating a birthday.
    #[derive(Debug, Clone)]
    pub struct CreateBirthdayResult {
        pub birthday: DomainBirthday,
    }

    /// Result of fetching a single birthday.
    #[derive(Debug, Clone)]
    pub struct GetBirthdayResult {
        pub birthday: Option<DomainBirthday>,
    }

    /// Result of listing birthdays.
    #[derive(Debug, Clone)]
    pub struct BirthdayListResult {
        pub birthdays: Vec<DomainBirthday>,
    }

    /// One entry of the proximity-sorted upcoming view.
    #[derive(Debug, Clone)]
    pub struct UpcomingBirthdayEntry {
        pub birthday: DomainBirthday,
        pub days_until: i64,
        pub label: String,
    }

    /// Result of the upcoming view and of name search (both stay sorted by
    /// proximity).
    #[derive(Debug, Clone)]
    pub struct UpcomingBirthdaysResult {
        pub birthdays: Vec<UpcomingBirthdayEntry>,
    }

    /// Result of updating a birthday.
    #[derive(Debug, Clone)]
    pub struct UpdateBirthdayResult {
        pub birthday: DomainBirthday,
    }

    /// Result of deleting a birthday.
    #[derive(Debug, Clone)]
    pub struct DeleteBirthdayResult {
        pub success_message: String,
    }
}

pub mod group {
    use crate::backend::domain::models::group::Group as DomainGroup;

    /// Input for creating a new group.
    #[derive(Debug, Clone)]
    pub struct CreateGroupCommand {
        pub name: String,
        pub description: Option<String>,
    }

    /// Input for updating a group.
    #[derive(Debug, Clone)]
    pub struct UpdateGroupCommand {
        pub group_id: String,
        pub name: Option<String>,
        pub description: Option<String>,
    }

    /// Result of creating a group.
    #[derive(Debug, Clone)]
    pub struct CreateGroupResult {
        pub group: DomainGroup,
    }

    /// Result of fetching a single group.
    #[derive(Debug, Clone)]
    pub struct GetGroupResult {
        pub group: Option<DomainGroup>,
    }

    /// Result of listing groups.
    #[derive(Debug, Clone)]
    pub struct GroupListResult {
        pub groups: Vec<DomainGroup>,
    }

    /// Result of updating a group.
    #[derive(Debug, Clone)]
    pub struct UpdateGroupResult {
        pub group: DomainGroup,
    }

    /// Result of deleting a group (cascade).
    #[derive(Debug, Clone)]
    pub struct DeleteGroupResult {
        pub deleted_birthdays: usize,
        pub detached_members: usize,
        pub success_message: String,
    }
}

pub mod user {
    use crate::backend::domain::models::user::{User as DomainUser, UserRole};

    /// Input for registering a user.
    #[derive(Debug, Clone)]
    pub struct RegisterUserCommand {
        pub email: String,
        pub role: UserRole,
        pub group_id: Option<String>,
    }

    /// Input for assigning a user to a group (or detaching with `None`).
    #[derive(Debug, Clone)]
    pub struct AssignGroupCommand {
        pub user_id: String,
        pub group_id: Option<String>,
    }

    /// Result of registering a user.
    #[derive(Debug, Clone)]
    pub struct RegisterUserResult {
        pub user: DomainUser,
    }

    /// Result of listing a group's members.
    #[derive(Debug, Clone)]
    pub struct GroupMembersResult {
        pub members: Vec<DomainUser>,
    }
}
