use anyhow::Result;
use chrono::Utc;
use log::{info, warn};
use std::sync::Arc;

use crate::backend::domain::commands::group::{
    CreateGroupCommand, CreateGroupResult, DeleteGroupResult, GetGroupResult, GroupListResult,
    UpdateGroupCommand, UpdateGroupResult,
};
use crate::backend::domain::models::group::Group as DomainGroup;
use crate::backend::storage::csv::{BirthdayRepository, CsvConnection, GroupRepository, UserRepository};
use crate::backend::storage::traits::{BirthdayStorage, GroupStorage, UserStorage};

/// Service for managing groups.
///
/// A group owns its birthdays: deleting a group deletes them too, and
/// detaches any members still pointing at it. Groups are only ever created
/// by an explicit command, never on the fly.
#[derive(Clone)]
pub struct GroupService {
    group_repository: GroupRepository,
    birthday_repository: BirthdayRepository,
    user_repository: UserRepository,
}

impl GroupService {
    /// Create a new GroupService
    pub fn new(connection: Arc<CsvConnection>) -> Self {
        Self {
            group_repository: GroupRepository::new(connection.clone()),
            birthday_repository: BirthdayRepository::new(connection.clone()),
            user_repository: UserRepository::new(connection),
        }
    }

    /// Create a new group
    pub fn create_group(&self, command: CreateGroupCommand) -> Result<CreateGroupResult> {
        info!("Creating group: name={}", command.name);

        self.validate_name(&command.name)?;

        let now = Utc::now();
        let group = DomainGroup {
            id: DomainGroup::generate_id(now.timestamp_millis() as u64),
            name: command.name.trim().to_string(),
            description: command.description.filter(|d| !d.trim().is_empty()),
            created_at: now,
            updated_at: now,
        };

        self.group_repository.store_group(&group)?;

        info!("Created group: {} with ID: {}", group.name, group.id);
        Ok(CreateGroupResult { group })
    }

    /// Get a group by ID
    pub fn get_group(&self, group_id: &str) -> Result<GetGroupResult> {
        let group = self.group_repository.get_group(group_id)?;
        if group.is_none() {
            warn!("Group not found: {}", group_id);
        }
        Ok(GetGroupResult { group })
    }

    /// List all groups
    pub fn list_groups(&self) -> Result<GroupListResult> {
        let groups = self.group_repository.list_groups()?;
        Ok(GroupListResult { groups })
    }

    /// Update an existing group
    pub fn update_group(&self, command: UpdateGroupCommand) -> Result<UpdateGroupResult> {
        info!("Updating group: {}", command.group_id);

        let mut group = self
            .group_repository
            .get_group(&command.group_id)?
            .ok_or_else(|| anyhow::anyhow!("Group not found: {}", command.group_id))?;

        if let Some(name) = command.name {
            self.validate_name(&name)?;
            group.name = name.trim().to_string();
        }
        if let Some(description) = command.description {
            group.description = if description.trim().is_empty() {
                None
            } else {
                Some(description)
            };
        }

        group.updated_at = Utc::now();
        self.group_repository.update_group(&group)?;

        info!("Updated group: {} with ID: {}", group.name, group.id);
        Ok(UpdateGroupResult { group })
    }

    /// Delete a group, cascading to its birthdays and detaching its members
    pub fn delete_group(&self, group_id: &str) -> Result<DeleteGroupResult> {
        info!("Deleting group: {}", group_id);

        let group = self
            .group_repository
            .get_group(group_id)?
            .ok_or_else(|| anyhow::anyhow!("Group not found: {}", group_id))?;

        let deleted_birthdays = self.birthday_repository.delete_birthdays_by_group(group_id)?;

        let members = self.user_repository.list_group_members(group_id)?;
        for member in &members {
            self.user_repository.set_user_group(&member.id, None)?;
        }

        self.group_repository.delete_group(group_id)?;

        info!(
            "Deleted group: {} ({} birthdays removed, {} members detached)",
            group.name,
            deleted_birthdays,
            members.len()
        );

        Ok(DeleteGroupResult {
            deleted_birthdays,
            detached_members: members.len(),
            success_message: format!("Group '{}' deleted successfully", group.name),
        })
    }

    fn validate_name(&self, name: &str) -> Result<()> {
        if name.trim().len() < 3 {
            return Err(anyhow::anyhow!("Group name must be at least 3 characters"));
        }
        if name.len() > 100 {
            return Err(anyhow::anyhow!("Group name cannot exceed 100 characters"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::commands::birthday::CreateBirthdayCommand;
    use crate::backend::domain::commands::user::RegisterUserCommand;
    use crate::backend::domain::birthday_service::BirthdayService;
    use crate::backend::domain::user_service::UserService;
    use tempfile::{tempdir, TempDir};

    fn setup_test() -> (GroupService, Arc<CsvConnection>, TempDir) {
        let temp_dir = tempdir().unwrap();
        let connection = Arc::new(CsvConnection::new(temp_dir.path()).unwrap());
        (GroupService::new(connection.clone()), connection, temp_dir)
    }

    #[test]
    fn test_create_group() {
        let (service, _conn, _temp_dir) = setup_test();

        let result = service
            .create_group(CreateGroupCommand {
                name: "  Family ".to_string(),
                description: Some("Close family".to_string()),
            })
            .unwrap();

        assert_eq!(result.group.name, "Family");
        assert_eq!(result.group.description.as_deref(), Some("Close family"));
    }

    #[test]
    fn test_create_group_validation() {
        let (service, _conn, _temp_dir) = setup_test();

        let too_short = CreateGroupCommand {
            name: "ab".to_string(),
            description: None,
        };
        assert!(service.create_group(too_short).is_err());

        let too_long = CreateGroupCommand {
            name: "a".repeat(101),
            description: None,
        };
        assert!(service.create_group(too_long).is_err());
    }

    #[test]
    fn test_update_group() {
        let (service, _conn, _temp_dir) = setup_test();

        let created = service
            .create_group(CreateGroupCommand {
                name: "Original".to_string(),
                description: None,
            })
            .unwrap();

        let updated = service
            .update_group(UpdateGroupCommand {
                group_id: created.group.id.clone(),
                name: Some("Renamed".to_string()),
                description: Some("Now with description".to_string()),
            })
            .unwrap();

        assert_eq!(updated.group.name, "Renamed");
        assert!(updated.group.updated_at >= created.group.created_at);
    }

    #[test]
    fn test_delete_group_cascades() {
        let (service, connection, _temp_dir) = setup_test();
        let birthday_service = BirthdayService::new(connection.clone());
        let user_service = UserService::new(connection.clone());

        let group = service
            .create_group(CreateGroupCommand {
                name: "Doomed Group".to_string(),
                description: None,
            })
            .unwrap()
            .group;

        for name in ["Alice", "Bob"] {
            birthday_service
                .create_birthday(CreateBirthdayCommand {
                    name: name.to_string(),
                    birthdate: "1990-06-04".to_string(),
                    message: None,
                    group_id: group.id.clone(),
                })
                .unwrap();
        }

        let member = user_service
            .register_user(RegisterUserCommand {
                email: "member@example.com".to_string(),
                role: crate::backend::domain::models::user::UserRole::Member,
                group_id: Some(group.id.clone()),
            })
            .unwrap()
            .user;

        let result = service.delete_group(&group.id).unwrap();
        assert_eq!(result.deleted_birthdays, 2);
        assert_eq!(result.detached_members, 1);

        assert!(service.get_group(&group.id).unwrap().group.is_none());
        let detached = UserRepository::new(connection).get_user(&member.id).unwrap().unwrap();
        assert!(detached.group_id.is_none());
    }

    #[test]
    fn test_delete_nonexistent_group() {
        let (service, _conn, _temp_dir) = setup_test();
        assert!(service.delete_group("group::missing").is_err());
    }
}
