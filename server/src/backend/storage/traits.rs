//! # Storage Traits
//!
//! This module defines the storage abstraction traits that let different
//! storage backends be used interchangeably by the domain layer. The domain
//! services and the notification sweep are written against these traits
//! only; the file-backed implementation lives under `storage::csv`.

use anyhow::Result;

use crate::backend::domain::models::birthday::Birthday as DomainBirthday;
use crate::backend::domain::models::group::Group as DomainGroup;
use crate::backend::domain::models::user::User as DomainUser;

/// Trait defining the interface for birthday storage operations
pub trait BirthdayStorage: Send + Sync {
    /// Store a new birthday
    fn store_birthday(&self, birthday: &DomainBirthday) -> Result<()>;

    /// Retrieve a specific birthday by ID
    fn get_birthday(&self, birthday_id: &str) -> Result<Option<DomainBirthday>>;

    /// List all birthdays across all groups
    fn list_birthdays(&self) -> Result<Vec<DomainBirthday>>;

    /// List the birthdays belonging to one group
    fn list_birthdays_by_group(&self, group_id: &str) -> Result<Vec<DomainBirthday>>;

    /// Update an existing birthday
    fn update_birthday(&self, birthday: &DomainBirthday) -> Result<()>;

    /// Delete a birthday by ID
    /// Returns true if the birthday was found and deleted, false otherwise
    fn delete_birthday(&self, birthday_id: &str) -> Result<bool>;

    /// Delete all birthdays belonging to a group (cascade on group delete)
    /// Returns the number of birthdays deleted
    fn delete_birthdays_by_group(&self, group_id: &str) -> Result<usize>;

    /// Set `notified = true` only if it is currently false.
    ///
    /// Returns true if the flag was flipped by this call. The conditional
    /// form keeps two overlapping sweeps from both claiming the same
    /// birthday and double-sending.
    fn mark_notified_if_pending(&self, birthday_id: &str) -> Result<bool>;

    /// Commit a batch of notified-flag changes from a sweep.
    ///
    /// Updates are applied together per storage file; unknown IDs are
    /// ignored so a birthday deleted mid-sweep does not fail the commit.
    fn commit_notified_flags(&self, updates: &[(String, bool)]) -> Result<()>;
}

/// Trait defining the interface for group storage operations
pub trait GroupStorage: Send + Sync {
    /// Store a new group
    fn store_group(&self, group: &DomainGroup) -> Result<()>;

    /// Retrieve a specific group by ID
    fn get_group(&self, group_id: &str) -> Result<Option<DomainGroup>>;

    /// List all groups ordered by name
    fn list_groups(&self) -> Result<Vec<DomainGroup>>;

    /// Update an existing group
    fn update_group(&self, group: &DomainGroup) -> Result<()>;

    /// Delete a group by ID
    fn delete_group(&self, group_id: &str) -> Result<()>;
}

/// Trait defining the interface for user storage operations
pub trait UserStorage: Send + Sync {
    /// Store a new user
    fn store_user(&self, user: &DomainUser) -> Result<()>;

    /// Retrieve a specific user by ID
    fn get_user(&self, user_id: &str) -> Result<Option<DomainUser>>;

    /// Retrieve a user by email (emails are unique)
    fn get_user_by_email(&self, email: &str) -> Result<Option<DomainUser>>;

    /// List all users ordered by email
    fn list_users(&self) -> Result<Vec<DomainUser>>;

    /// List the members of a group
    fn list_group_members(&self, group_id: &str) -> Result<Vec<DomainUser>>;

    /// List the notification recipient addresses for a group
    fn list_group_recipients(&self, group_id: &str) -> Result<Vec<String>>;

    /// Move a user into a group, or detach with `None`
    fn set_user_group(&self, user_id: &str, group_id: Option<&str>) -> Result<()>;
}
