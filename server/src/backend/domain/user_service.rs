use anyhow::Result;
use chrono::Utc;
use log::info;
use std::sync::Arc;

use crate::backend::domain::commands::user::{
    AssignGroupCommand, GroupMembersResult, RegisterUserCommand, RegisterUserResult,
};
use crate::backend::domain::models::user::User as DomainUser;
use crate::backend::storage::csv::{CsvConnection, GroupRepository, UserRepository};
use crate::backend::storage::traits::{GroupStorage, UserStorage};

/// Service for managing users and their group membership.
///
/// Authentication happens elsewhere; this service only tracks who exists
/// and which group's birthday alerts they receive.
#[derive(Clone)]
pub struct UserService {
    user_repository: UserRepository,
    group_repository: GroupRepository,
}

impl UserService {
    /// Create a new UserService
    pub fn new(connection: Arc<CsvConnection>) -> Self {
        Self {
            user_repository: UserRepository::new(connection.clone()),
            group_repository: GroupRepository::new(connection),
        }
    }

    /// Register a new user
    pub fn register_user(&self, command: RegisterUserCommand) -> Result<RegisterUserResult> {
        info!("Registering user: email={}, role={}", command.email, command.role);

        let email = command.email.trim().to_string();
        if email.is_empty() || !email.contains('@') {
            return Err(anyhow::anyhow!("Invalid email address: {}", command.email));
        }
        if self.user_repository.get_user_by_email(&email)?.is_some() {
            return Err(anyhow::anyhow!("Email already registered: {}", email));
        }
        if let Some(ref group_id) = command.group_id {
            self.group_repository
                .get_group(group_id)?
                .ok_or_else(|| anyhow::anyhow!("Group not found: {}", group_id))?;
        }

        let now = Utc::now();
        let user = DomainUser {
            id: DomainUser::generate_id(now.timestamp_millis() as u64),
            email,
            role: command.role,
            group_id: command.group_id,
            created_at: now,
            updated_at: now,
        };

        self.user_repository.store_user(&user)?;

        info!("Registered user: {} with ID: {}", user.email, user.id);
        Ok(RegisterUserResult { user })
    }

    /// List a group's members
    pub fn list_group_members(&self, group_id: &str) -> Result<GroupMembersResult> {
        let members = self.user_repository.list_group_members(group_id)?;
        Ok(GroupMembersResult { members })
    }

    /// Assign a user to a group, or detach them with `group_id = None`
    pub fn assign_group(&self, command: AssignGroupCommand) -> Result<()> {
        info!(
            "Assigning user {} to group {:?}",
            command.user_id, command.group_id
        );

        if let Some(ref group_id) = command.group_id {
            self.group_repository
                .get_group(group_id)?
                .ok_or_else(|| anyhow::anyhow!("Group not found: {}", group_id))?;
        }

        self.user_repository
            .set_user_group(&command.user_id, command.group_id.as_deref())
    }
}
