use anyhow::Result;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use super::connection::{atomic_write, CsvConnection};
use crate::backend::domain::models::group::Group as DomainGroup;
use crate::backend::storage::traits::GroupStorage;

/// Intermediate struct for YAML serialization with string date fields
#[derive(Debug, Clone, Serialize, Deserialize)]
struct YamlGroup {
    id: String,
    name: String,
    description: Option<String>,
    created_at: String,
    updated_at: String,
}

/// File-backed group repository using filesystem discovery.
///
/// Each group lives in its own directory (named from the group name) holding
/// a `group.yaml` plus that group's `birthdays.csv`.
#[derive(Clone)]
pub struct GroupRepository {
    connection: Arc<CsvConnection>,
}

impl GroupRepository {
    /// Create a new group repository
    pub fn new(connection: Arc<CsvConnection>) -> Self {
        Self { connection }
    }

    /// Generate a safe filesystem identifier from a group name.
    /// Converts "Family Smith" -> "family_smith", "Team #1" -> "team_1", etc.
    pub fn generate_safe_directory_name(group_name: &str) -> String {
        let mut result = String::new();
        let mut last_was_underscore = false;

        for c in group_name.chars() {
            let mapped = if c.is_ascii_alphanumeric() {
                Some(c.to_ascii_lowercase())
            } else if c.is_whitespace() || c == '_' || c == '-' || c == '#' {
                None
            } else {
                // Fold the common accented latin letters, drop the rest
                match c {
                    'á' | 'à' | 'ä' | 'â' | 'Á' | 'À' | 'Ä' | 'Â' => Some('a'),
                    'é' | 'è' | 'ë' | 'ê' | 'É' | 'È' | 'Ë' | 'Ê' => Some('e'),
                    'í' | 'ì' | 'ï' | 'î' | 'Í' | 'Ì' | 'Ï' | 'Î' => Some('i'),
                    'ó' | 'ò' | 'ö' | 'ô' | 'Ó' | 'Ò' | 'Ö' | 'Ô' => Some('o'),
                    'ú' | 'ù' | 'ü' | 'û' | 'Ú' | 'Ù' | 'Ü' | 'Û' => Some('u'),
                    'ñ' | 'Ñ' => Some('n'),
                    'ç' | 'Ç' => Some('c'),
                    _ => None,
                }
            };

            match mapped {
                Some(c) => {
                    result.push(c);
                    last_was_underscore = false;
                }
                None => {
                    if !last_was_underscore && !result.is_empty() {
                        result.push('_');
                    }
                    last_was_underscore = true;
                }
            }
        }

        result.trim_matches('_').to_string()
    }

    /// Get the path to a group's YAML file
    fn group_yaml_path(&self, directory_name: &str) -> PathBuf {
        self.connection
            .group_directory(directory_name)
            .join("group.yaml")
    }

    /// Load a group from a specific directory
    pub(crate) fn load_group_from_directory(
        &self,
        directory_name: &str,
    ) -> Result<Option<DomainGroup>> {
        let yaml_path = self.group_yaml_path(directory_name);

        if !yaml_path.exists() {
            return Ok(None);
        }

        let yaml_content = fs::read_to_string(&yaml_path)?;
        let yaml_group: YamlGroup = serde_yaml::from_str(&yaml_content)?;

        let domain_group = DomainGroup {
            id: yaml_group.id,
            name: yaml_group.name,
            description: yaml_group.description,
            created_at: chrono::DateTime::parse_from_rfc3339(&yaml_group.created_at)
                .map_err(|e| anyhow::anyhow!("Failed to parse created_at: {}", e))?
                .with_timezone(&chrono::Utc),
            updated_at: chrono::DateTime::parse_from_rfc3339(&yaml_group.updated_at)
                .map_err(|e| anyhow::anyhow!("Failed to parse updated_at: {}", e))?
                .with_timezone(&chrono::Utc),
        };

        Ok(Some(domain_group))
    }

    /// Save a group to its directory
    fn save_group_to_directory(&self, group: &DomainGroup, directory_name: &str) -> Result<()> {
        let yaml_group = YamlGroup {
            id: group.id.clone(),
            name: group.name.clone(),
            description: group.description.clone(),
            created_at: group.created_at.to_rfc3339(),
            updated_at: group.updated_at.to_rfc3339(),
        };

        let yaml_content = serde_yaml::to_string(&yaml_group)?;
        atomic_write(&self.group_yaml_path(directory_name), yaml_content.as_bytes())?;

        debug!("Saved group {} to directory: {}", group.name, directory_name);
        Ok(())
    }

    /// Discover all groups by scanning directories
    fn discover_groups(&self) -> Result<Vec<DomainGroup>> {
        let mut groups = Vec::new();

        for directory_name in self.connection.group_directories()? {
            match self.load_group_from_directory(&directory_name) {
                Ok(Some(group)) => groups.push(group),
                Ok(None) => {}
                Err(e) => {
                    warn!("Error loading group from directory {}: {}", directory_name, e);
                }
            }
        }

        groups.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(groups)
    }
}

impl GroupStorage for GroupRepository {
    fn store_group(&self, group: &DomainGroup) -> Result<()> {
        let _guard = self.connection.write_guard();
        let directory_name = Self::generate_safe_directory_name(&group.name);
        if directory_name.is_empty() {
            return Err(anyhow::anyhow!(
                "Group name '{}' yields no usable directory name",
                group.name
            ));
        }
        if self.connection.group_id_of_directory(&directory_name)?.is_some() {
            return Err(anyhow::anyhow!(
                "A group named '{}' already exists",
                group.name
            ));
        }
        self.save_group_to_directory(group, &directory_name)
    }

    fn get_group(&self, group_id: &str) -> Result<Option<DomainGroup>> {
        match self.connection.find_group_directory(group_id)? {
            Some(directory_name) => self.load_group_from_directory(&directory_name),
            None => Ok(None),
        }
    }

    fn list_groups(&self) -> Result<Vec<DomainGroup>> {
        self.discover_groups()
    }

    fn update_group(&self, group: &DomainGroup) -> Result<()> {
        let _guard = self.connection.write_guard();
        // Keep the existing directory on rename so the group's birthday file
        // stays alongside it
        match self.connection.find_group_directory(&group.id)? {
            Some(directory_name) => self.save_group_to_directory(group, &directory_name),
            None => {
                warn!("Attempted to update a non-existent group: {}", group.id);
                Err(anyhow::anyhow!("Group not found for update"))
            }
        }
    }

    fn delete_group(&self, group_id: &str) -> Result<()> {
        let _guard = self.connection.write_guard();
        if let Some(directory_name) = self.connection.find_group_directory(group_id)? {
            let group_dir = self.connection.group_directory(&directory_name);
            if group_dir.exists() {
                fs::remove_dir_all(&group_dir)?;
                info!("Deleted group directory: {:?}", group_dir);
            }
        } else {
            warn!("Attempted to delete a non-existent group: {}", group_id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_repo() -> (GroupRepository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let connection = CsvConnection::new(temp_dir.path()).unwrap();
        let repo = GroupRepository::new(Arc::new(connection));
        (repo, temp_dir)
    }

    fn make_group(id: &str, name: &str) -> DomainGroup {
        let now = chrono::Utc::now();
        DomainGroup {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_generate_safe_directory_name() {
        assert_eq!(GroupRepository::generate_safe_directory_name("Family Smith"), "family_smith");
        assert_eq!(GroupRepository::generate_safe_directory_name("Équipe Café"), "equipe_cafe");
        assert_eq!(GroupRepository::generate_safe_directory_name("Team #1"), "team_1");
        assert_eq!(GroupRepository::generate_safe_directory_name("a--b  c"), "a_b_c");
    }

    #[test]
    fn test_store_and_discover_group() {
        let (repo, _temp_dir) = setup_test_repo();

        let group = make_group("group::123", "Test Group");
        repo.store_group(&group).expect("Failed to store group");

        let groups = repo.list_groups().expect("Failed to list groups");
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].id, "group::123");

        let retrieved = repo.get_group("group::123").expect("Failed to get group");
        assert_eq!(retrieved.unwrap().name, "Test Group");
    }

    #[test]
    fn test_duplicate_group_name_rejected() {
        let (repo, _temp_dir) = setup_test_repo();

        repo.store_group(&make_group("group::1", "Family")).unwrap();
        assert!(repo.store_group(&make_group("group::2", "Family")).is_err());
    }

    #[test]
    fn test_update_keeps_directory() {
        let (repo, temp_dir) = setup_test_repo();

        let mut group = make_group("group::7", "Old Name");
        repo.store_group(&group).unwrap();

        group.name = "New Name".to_string();
        repo.update_group(&group).unwrap();

        // Directory is still the one derived from the original name
        assert!(temp_dir.path().join("old_name").join("group.yaml").exists());
        let retrieved = repo.get_group("group::7").unwrap().unwrap();
        assert_eq!(retrieved.name, "New Name");
    }

    #[test]
    fn test_delete_group_removes_directory() {
        let (repo, temp_dir) = setup_test_repo();

        repo.store_group(&make_group("group::9", "Doomed")).unwrap();
        assert!(temp_dir.path().join("doomed").exists());

        repo.delete_group("group::9").unwrap();
        assert!(!temp_dir.path().join("doomed").exists());
        assert!(repo.get_group("group::9").unwrap().is_none());
    }
}
