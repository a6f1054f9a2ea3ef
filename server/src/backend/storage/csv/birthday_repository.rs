use anyhow::{Context, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use super::connection::{atomic_write, CsvConnection};
use crate::backend::domain::models::birthday::Birthday as DomainBirthday;
use crate::backend::storage::traits::BirthdayStorage;

/// Intermediate struct for CSV serialization with string date fields
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CsvBirthday {
    id: String,
    name: String,
    birthdate: String,
    /// Empty string means no message
    message: String,
    group_id: String,
    notified: bool,
    created_at: String,
    updated_at: String,
}

impl CsvBirthday {
    fn from_domain(birthday: &DomainBirthday) -> Self {
        Self {
            id: birthday.id.clone(),
            name: birthday.name.clone(),
            birthdate: birthday.birthdate.format("%Y-%m-%d").to_string(),
            message: birthday.message.clone().unwrap_or_default(),
            group_id: birthday.group_id.clone(),
            notified: birthday.notified,
            created_at: birthday.created_at.to_rfc3339(),
            updated_at: birthday.updated_at.to_rfc3339(),
        }
    }

    fn into_domain(self) -> Result<DomainBirthday> {
        Ok(DomainBirthday {
            birthdate: chrono::NaiveDate::parse_from_str(&self.birthdate, "%Y-%m-%d")
                .with_context(|| format!("Failed to parse birthdate for {}", self.id))?,
            message: if self.message.is_empty() {
                None
            } else {
                Some(self.message)
            },
            created_at: chrono::DateTime::parse_from_rfc3339(&self.created_at)
                .map_err(|e| anyhow::anyhow!("Failed to parse created_at: {}", e))?
                .with_timezone(&chrono::Utc),
            updated_at: chrono::DateTime::parse_from_rfc3339(&self.updated_at)
                .map_err(|e| anyhow::anyhow!("Failed to parse updated_at: {}", e))?
                .with_timezone(&chrono::Utc),
            id: self.id,
            name: self.name,
            group_id: self.group_id,
            notified: self.notified,
        })
    }
}

/// CSV-backed birthday repository.
///
/// Each group's birthdays live in a `birthdays.csv` next to the group's
/// `group.yaml`. Files are rewritten whole through atomic renames; mutations
/// run under the connection's write lock.
#[derive(Clone)]
pub struct BirthdayRepository {
    connection: Arc<CsvConnection>,
}

impl BirthdayRepository {
    /// Create a new CSV birthday repository
    pub fn new(connection: Arc<CsvConnection>) -> Self {
        Self { connection }
    }

    /// Path of one group's birthday file
    fn birthdays_csv_path(&self, directory_name: &str) -> PathBuf {
        self.connection
            .group_directory(directory_name)
            .join("birthdays.csv")
    }

    /// Load all birthdays stored in one group directory
    fn load_directory(&self, directory_name: &str) -> Result<Vec<DomainBirthday>> {
        let csv_path = self.birthdays_csv_path(directory_name);
        if !csv_path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&csv_path)
            .with_context(|| format!("Failed to open {:?}", csv_path))?;

        let mut birthdays = Vec::new();
        for record in reader.deserialize() {
            let csv_birthday: CsvBirthday = record?;
            birthdays.push(csv_birthday.into_domain()?);
        }
        Ok(birthdays)
    }

    /// Rewrite one group directory's birthday file
    fn save_directory(&self, directory_name: &str, birthdays: &[DomainBirthday]) -> Result<()> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for birthday in birthdays {
            writer.serialize(CsvBirthday::from_domain(birthday))?;
        }
        let content = writer.into_inner().context("Failed to finish CSV buffer")?;
        atomic_write(&self.birthdays_csv_path(directory_name), &content)?;
        debug!("Saved {} birthdays to directory: {}", birthdays.len(), directory_name);
        Ok(())
    }

    /// Find the directory whose birthday file contains this ID
    fn find_directory_by_birthday_id(
        &self,
        birthday_id: &str,
    ) -> Result<Option<(String, Vec<DomainBirthday>)>> {
        for directory_name in self.connection.group_directories()? {
            let birthdays = self.load_directory(&directory_name)?;
            if birthdays.iter().any(|b| b.id == birthday_id) {
                return Ok(Some((directory_name, birthdays)));
            }
        }
        Ok(None)
    }
}

impl BirthdayStorage for BirthdayRepository {
    fn store_birthday(&self, birthday: &DomainBirthday) -> Result<()> {
        let _guard = self.connection.write_guard();
        let directory_name = self
            .connection
            .find_group_directory(&birthday.group_id)?
            .ok_or_else(|| anyhow::anyhow!("Group not found: {}", birthday.group_id))?;

        let mut birthdays = self.load_directory(&directory_name)?;
        birthdays.push(birthday.clone());
        self.save_directory(&directory_name, &birthdays)
    }

    fn get_birthday(&self, birthday_id: &str) -> Result<Option<DomainBirthday>> {
        Ok(self
            .find_directory_by_birthday_id(birthday_id)?
            .and_then(|(_, birthdays)| birthdays.into_iter().find(|b| b.id == birthday_id)))
    }

    fn list_birthdays(&self) -> Result<Vec<DomainBirthday>> {
        let mut all = Vec::new();
        for directory_name in self.connection.group_directories()? {
            all.extend(self.load_directory(&directory_name)?);
        }
        Ok(all)
    }

    fn list_birthdays_by_group(&self, group_id: &str) -> Result<Vec<DomainBirthday>> {
        match self.connection.find_group_directory(group_id)? {
            Some(directory_name) => self.load_directory(&directory_name),
            None => Ok(Vec::new()),
        }
    }

    fn update_birthday(&self, birthday: &DomainBirthday) -> Result<()> {
        let _guard = self.connection.write_guard();
        let (directory_name, mut birthdays) = self
            .find_directory_by_birthday_id(&birthday.id)?
            .ok_or_else(|| anyhow::anyhow!("Birthday not found for update: {}", birthday.id))?;

        for existing in birthdays.iter_mut() {
            if existing.id == birthday.id {
                *existing = birthday.clone();
            }
        }
        self.save_directory(&directory_name, &birthdays)
    }

    fn delete_birthday(&self, birthday_id: &str) -> Result<bool> {
        let _guard = self.connection.write_guard();
        match self.find_directory_by_birthday_id(birthday_id)? {
            Some((directory_name, mut birthdays)) => {
                birthdays.retain(|b| b.id != birthday_id);
                self.save_directory(&directory_name, &birthdays)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete_birthdays_by_group(&self, group_id: &str) -> Result<usize> {
        let _guard = self.connection.write_guard();
        let directory_name = match self.connection.find_group_directory(group_id)? {
            Some(name) => name,
            None => return Ok(0),
        };

        let count = self.load_directory(&directory_name)?.len();
        let csv_path = self.birthdays_csv_path(&directory_name);
        if csv_path.exists() {
            fs::remove_file(&csv_path)?;
        }
        Ok(count)
    }

    fn mark_notified_if_pending(&self, birthday_id: &str) -> Result<bool> {
        let _guard = self.connection.write_guard();
        let (directory_name, mut birthdays) = match self.find_directory_by_birthday_id(birthday_id)? {
            Some(found) => found,
            None => {
                warn!("mark_notified_if_pending: birthday not found: {}", birthday_id);
                return Ok(false);
            }
        };

        let mut flipped = false;
        for birthday in birthdays.iter_mut() {
            if birthday.id == birthday_id && !birthday.notified {
                birthday.notified = true;
                flipped = true;
            }
        }
        if flipped {
            self.save_directory(&directory_name, &birthdays)?;
        }
        Ok(flipped)
    }

    fn commit_notified_flags(&self, updates: &[(String, bool)]) -> Result<()> {
        if updates.is_empty() {
            return Ok(());
        }

        let _guard = self.connection.write_guard();
        let changes: HashMap<&str, bool> = updates
            .iter()
            .map(|(id, notified)| (id.as_str(), *notified))
            .collect();

        for directory_name in self.connection.group_directories()? {
            let mut birthdays = self.load_directory(&directory_name)?;
            let mut dirty = false;
            for birthday in birthdays.iter_mut() {
                if let Some(&notified) = changes.get(birthday.id.as_str()) {
                    if birthday.notified != notified {
                        birthday.notified = notified;
                        dirty = true;
                    }
                }
            }
            if dirty {
                self.save_directory(&directory_name, &birthdays)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::storage::csv::group_repository::GroupRepository;
    use crate::backend::storage::traits::GroupStorage;
    use tempfile::TempDir;

    fn setup_test_repo() -> (BirthdayRepository, GroupRepository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let connection = Arc::new(CsvConnection::new(temp_dir.path()).unwrap());
        let groups = GroupRepository::new(connection.clone());
        let repo = BirthdayRepository::new(connection);
        (repo, groups, temp_dir)
    }

    fn store_group(groups: &GroupRepository, id: &str, name: &str) {
        let now = chrono::Utc::now();
        groups
            .store_group(&crate::backend::domain::models::group::Group {
                id: id.to_string(),
                name: name.to_string(),
                description: None,
                created_at: now,
                updated_at: now,
            })
            .unwrap();
    }

    fn make_birthday(id: &str, group_id: &str, notified: bool) -> DomainBirthday {
        let now = chrono::Utc::now();
        DomainBirthday {
            id: id.to_string(),
            name: format!("Person {}", id),
            birthdate: chrono::NaiveDate::from_ymd_opt(1990, 6, 4).unwrap(),
            message: Some("See you there".to_string()),
            group_id: group_id.to_string(),
            notified,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_store_and_load_roundtrip() {
        let (repo, groups, _temp_dir) = setup_test_repo();
        store_group(&groups, "group::1", "Family");

        let birthday = make_birthday("birthday::1", "group::1", false);
        repo.store_birthday(&birthday).unwrap();

        let loaded = repo.get_birthday("birthday::1").unwrap().unwrap();
        assert_eq!(loaded.name, birthday.name);
        assert_eq!(loaded.birthdate, birthday.birthdate);
        assert_eq!(loaded.message.as_deref(), Some("See you there"));
        assert!(!loaded.notified);
    }

    #[test]
    fn test_store_rejects_unknown_group() {
        let (repo, _groups, _temp_dir) = setup_test_repo();
        let birthday = make_birthday("birthday::1", "group::missing", false);
        assert!(repo.store_birthday(&birthday).is_err());
    }

    #[test]
    fn test_list_by_group_and_all() {
        let (repo, groups, _temp_dir) = setup_test_repo();
        store_group(&groups, "group::1", "Family");
        store_group(&groups, "group::2", "Friends");

        repo.store_birthday(&make_birthday("birthday::1", "group::1", false)).unwrap();
        repo.store_birthday(&make_birthday("birthday::2", "group::1", false)).unwrap();
        repo.store_birthday(&make_birthday("birthday::3", "group::2", false)).unwrap();

        assert_eq!(repo.list_birthdays_by_group("group::1").unwrap().len(), 2);
        assert_eq!(repo.list_birthdays_by_group("group::2").unwrap().len(), 1);
        assert_eq!(repo.list_birthdays().unwrap().len(), 3);
    }

    #[test]
    fn test_delete_birthday() {
        let (repo, groups, _temp_dir) = setup_test_repo();
        store_group(&groups, "group::1", "Family");
        repo.store_birthday(&make_birthday("birthday::1", "group::1", false)).unwrap();

        assert!(repo.delete_birthday("birthday::1").unwrap());
        assert!(!repo.delete_birthday("birthday::1").unwrap());
        assert!(repo.get_birthday("birthday::1").unwrap().is_none());
    }

    #[test]
    fn test_delete_birthdays_by_group() {
        let (repo, groups, _temp_dir) = setup_test_repo();
        store_group(&groups, "group::1", "Family");
        repo.store_birthday(&make_birthday("birthday::1", "group::1", false)).unwrap();
        repo.store_birthday(&make_birthday("birthday::2", "group::1", false)).unwrap();

        assert_eq!(repo.delete_birthdays_by_group("group::1").unwrap(), 2);
        assert!(repo.list_birthdays_by_group("group::1").unwrap().is_empty());
    }

    #[test]
    fn test_mark_notified_if_pending_is_conditional() {
        let (repo, groups, _temp_dir) = setup_test_repo();
        store_group(&groups, "group::1", "Family");
        repo.store_birthday(&make_birthday("birthday::1", "group::1", false)).unwrap();

        // First call flips the flag, second call sees it already set
        assert!(repo.mark_notified_if_pending("birthday::1").unwrap());
        assert!(!repo.mark_notified_if_pending("birthday::1").unwrap());
        assert!(repo.get_birthday("birthday::1").unwrap().unwrap().notified);

        // Unknown IDs report no flip rather than failing
        assert!(!repo.mark_notified_if_pending("birthday::nope").unwrap());
    }

    #[test]
    fn test_commit_notified_flags_batch() {
        let (repo, groups, _temp_dir) = setup_test_repo();
        store_group(&groups, "group::1", "Family");
        store_group(&groups, "group::2", "Friends");
        repo.store_birthday(&make_birthday("birthday::1", "group::1", false)).unwrap();
        repo.store_birthday(&make_birthday("birthday::2", "group::2", true)).unwrap();

        repo.commit_notified_flags(&[
            ("birthday::1".to_string(), true),
            ("birthday::2".to_string(), false),
            ("birthday::gone".to_string(), true),
        ])
        .unwrap();

        assert!(repo.get_birthday("birthday::1").unwrap().unwrap().notified);
        assert!(!repo.get_birthday("birthday::2").unwrap().unwrap().notified);
    }
}
