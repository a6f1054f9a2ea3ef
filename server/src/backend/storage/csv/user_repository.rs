use anyhow::Result;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use super::connection::{atomic_write, CsvConnection};
use crate::backend::domain::models::user::{User as DomainUser, UserRole};
use crate::backend::storage::traits::UserStorage;

/// Intermediate struct for YAML serialization with string date/role fields
#[derive(Debug, Clone, Serialize, Deserialize)]
struct YamlUser {
    id: String,
    email: String,
    role: String,
    group_id: Option<String>,
    created_at: String,
    updated_at: String,
}

/// File-backed user repository.
///
/// All users live in a single `users.yaml` at the data directory root;
/// group membership is a reference into the group directories.
#[derive(Clone)]
pub struct UserRepository {
    connection: Arc<CsvConnection>,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(connection: Arc<CsvConnection>) -> Self {
        Self { connection }
    }

    /// Path of the global users file
    fn users_yaml_path(&self) -> PathBuf {
        self.connection.base_directory().join("users.yaml")
    }

    /// Load all users from the global file
    fn load_users(&self) -> Result<Vec<DomainUser>> {
        let yaml_path = self.users_yaml_path();
        if !yaml_path.exists() {
            return Ok(Vec::new());
        }

        let yaml_content = fs::read_to_string(&yaml_path)?;
        let yaml_users: Vec<YamlUser> = serde_yaml::from_str(&yaml_content)?;

        let mut users = Vec::new();
        for yaml_user in yaml_users {
            users.push(DomainUser {
                id: yaml_user.id,
                email: yaml_user.email,
                role: yaml_user.role.parse::<UserRole>()?,
                group_id: yaml_user.group_id,
                created_at: chrono::DateTime::parse_from_rfc3339(&yaml_user.created_at)
                    .map_err(|e| anyhow::anyhow!("Failed to parse created_at: {}", e))?
                    .with_timezone(&chrono::Utc),
                updated_at: chrono::DateTime::parse_from_rfc3339(&yaml_user.updated_at)
                    .map_err(|e| anyhow::anyhow!("Failed to parse updated_at: {}", e))?
                    .with_timezone(&chrono::Utc),
            });
        }
        Ok(users)
    }

    /// Rewrite the global users file
    fn save_users(&self, users: &[DomainUser]) -> Result<()> {
        let yaml_users: Vec<YamlUser> = users
            .iter()
            .map(|user| YamlUser {
                id: user.id.clone(),
                email: user.email.clone(),
                role: user.role.to_string(),
                group_id: user.group_id.clone(),
                created_at: user.created_at.to_rfc3339(),
                updated_at: user.updated_at.to_rfc3339(),
            })
            .collect();

        let yaml_content = serde_yaml::to_string(&yaml_users)?;
        atomic_write(&self.users_yaml_path(), yaml_content.as_bytes())?;
        debug!("Saved {} users", users.len());
        Ok(())
    }
}

impl UserStorage for UserRepository {
    fn store_user(&self, user: &DomainUser) -> Result<()> {
        let _guard = self.connection.write_guard();
        let mut users = self.load_users()?;
        if users.iter().any(|u| u.email == user.email) {
            return Err(anyhow::anyhow!("Email already registered: {}", user.email));
        }
        users.push(user.clone());
        self.save_users(&users)
    }

    fn get_user(&self, user_id: &str) -> Result<Option<DomainUser>> {
        Ok(self.load_users()?.into_iter().find(|u| u.id == user_id))
    }

    fn get_user_by_email(&self, email: &str) -> Result<Option<DomainUser>> {
        Ok(self.load_users()?.into_iter().find(|u| u.email == email))
    }

    fn list_users(&self) -> Result<Vec<DomainUser>> {
        let mut users = self.load_users()?;
        users.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(users)
    }

    fn list_group_members(&self, group_id: &str) -> Result<Vec<DomainUser>> {
        let mut members: Vec<DomainUser> = self
            .load_users()?
            .into_iter()
            .filter(|u| u.group_id.as_deref() == Some(group_id))
            .collect();
        members.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(members)
    }

    fn list_group_recipients(&self, group_id: &str) -> Result<Vec<String>> {
        Ok(self
            .list_group_members(group_id)?
            .into_iter()
            .map(|u| u.email)
            .collect())
    }

    fn set_user_group(&self, user_id: &str, group_id: Option<&str>) -> Result<()> {
        let _guard = self.connection.write_guard();
        let mut users = self.load_users()?;
        let user = users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| anyhow::anyhow!("User not found: {}", user_id))?;

        user.group_id = group_id.map(|g| g.to_string());
        user.updated_at = chrono::Utc::now();
        self.save_users(&users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_repo() -> (UserRepository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let connection = CsvConnection::new(temp_dir.path()).unwrap();
        (UserRepository::new(Arc::new(connection)), temp_dir)
    }

    fn make_user(id: &str, email: &str, group_id: Option<&str>) -> DomainUser {
        let now = chrono::Utc::now();
        DomainUser {
            id: id.to_string(),
            email: email.to_string(),
            role: UserRole::Member,
            group_id: group_id.map(|g| g.to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_store_and_get_user() {
        let (repo, _temp_dir) = setup_test_repo();

        repo.store_user(&make_user("user::1", "alice@example.com", None)).unwrap();

        let by_id = repo.get_user("user::1").unwrap().unwrap();
        assert_eq!(by_id.email, "alice@example.com");
        assert_eq!(by_id.role, UserRole::Member);

        let by_email = repo.get_user_by_email("alice@example.com").unwrap().unwrap();
        assert_eq!(by_email.id, "user::1");
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let (repo, _temp_dir) = setup_test_repo();

        repo.store_user(&make_user("user::1", "alice@example.com", None)).unwrap();
        assert!(repo.store_user(&make_user("user::2", "alice@example.com", None)).is_err());
    }

    #[test]
    fn test_group_recipients() {
        let (repo, _temp_dir) = setup_test_repo();

        repo.store_user(&make_user("user::1", "alice@example.com", Some("group::1"))).unwrap();
        repo.store_user(&make_user("user::2", "bob@example.com", Some("group::1"))).unwrap();
        repo.store_user(&make_user("user::3", "carol@example.com", Some("group::2"))).unwrap();
        repo.store_user(&make_user("user::4", "dave@example.com", None)).unwrap();

        let recipients = repo.list_group_recipients("group::1").unwrap();
        assert_eq!(recipients, vec!["alice@example.com", "bob@example.com"]);
        assert!(repo.list_group_recipients("group::9").unwrap().is_empty());
    }

    #[test]
    fn test_set_user_group() {
        let (repo, _temp_dir) = setup_test_repo();

        repo.store_user(&make_user("user::1", "alice@example.com", None)).unwrap();
        repo.set_user_group("user::1", Some("group::1")).unwrap();
        assert_eq!(
            repo.get_user("user::1").unwrap().unwrap().group_id.as_deref(),
            Some("group::1")
        );

        repo.set_user_group("user::1", None).unwrap();
        assert!(repo.get_user("user::1").unwrap().unwrap().group_id.is_none());

        assert!(repo.set_user_group("user::missing", None).is_err());
    }
}
