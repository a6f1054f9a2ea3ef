use anyhow::Result;
use chrono::{Local, NaiveDate, Utc};
use log::{info, warn};
use std::sync::Arc;

use crate::backend::domain::commands::birthday::{
    BirthdayListResult, CreateBirthdayCommand, CreateBirthdayResult, DeleteBirthdayResult,
    GetBirthdayResult, SearchBirthdaysQuery, UpcomingBirthdayEntry, UpcomingBirthdaysQuery,
    UpcomingBirthdaysResult, UpdateBirthdayCommand, UpdateBirthdayResult,
};
use crate::backend::domain::models::birthday::Birthday as DomainBirthday;
use crate::backend::domain::proximity;
use crate::backend::storage::csv::{BirthdayRepository, CsvConnection, GroupRepository};
use crate::backend::storage::traits::{BirthdayStorage, GroupStorage};

/// Service for managing birthdays and the proximity-sorted views over them.
#[derive(Clone)]
pub struct BirthdayService {
    birthday_repository: BirthdayRepository,
    group_repository: GroupRepository,
}

impl BirthdayService {
    /// Create a new BirthdayService
    pub fn new(connection: Arc<CsvConnection>) -> Self {
        Self {
            birthday_repository: BirthdayRepository::new(connection.clone()),
            group_repository: GroupRepository::new(connection),
        }
    }

    /// Create a new birthday
    pub fn create_birthday(&self, command: CreateBirthdayCommand) -> Result<CreateBirthdayResult> {
        info!(
            "Creating birthday: name={}, birthdate={}, group={}",
            command.name, command.birthdate, command.group_id
        );

        self.validate_name(&command.name)?;
        let birthdate = proximity::parse_birthdate(&command.birthdate)?;

        self.group_repository
            .get_group(&command.group_id)?
            .ok_or_else(|| anyhow::anyhow!("Group not found: {}", command.group_id))?;

        let now = Utc::now();
        let birthday = DomainBirthday {
            id: DomainBirthday::generate_id(now.timestamp_millis() as u64),
            name: command.name.trim().to_string(),
            birthdate,
            message: command.message.filter(|m| !m.trim().is_empty()),
            group_id: command.group_id,
            notified: false,
            created_at: now,
            updated_at: now,
        };

        self.birthday_repository.store_birthday(&birthday)?;

        info!("Created birthday: {} with ID: {}", birthday.name, birthday.id);
        Ok(CreateBirthdayResult { birthday })
    }

    /// Get a birthday by ID
    pub fn get_birthday(&self, birthday_id: &str) -> Result<GetBirthdayResult> {
        let birthday = self.birthday_repository.get_birthday(birthday_id)?;
        if birthday.is_none() {
            warn!("Birthday not found: {}", birthday_id);
        }
        Ok(GetBirthdayResult { birthday })
    }

    /// List all birthdays, or one group's birthdays
    pub fn list_birthdays(&self, group_id: Option<&str>) -> Result<BirthdayListResult> {
        let birthdays = match group_id {
            Some(group_id) => self.birthday_repository.list_birthdays_by_group(group_id)?,
            None => self.birthday_repository.list_birthdays()?,
        };
        Ok(BirthdayListResult { birthdays })
    }

    /// The proximity-sorted view used by list rendering.
    ///
    /// Entries come back ascending by days-until-next-occurrence, each with
    /// its presentation label attached.
    pub fn list_upcoming(&self, query: UpcomingBirthdaysQuery) -> Result<UpcomingBirthdaysResult> {
        let birthdays = self.list_birthdays(query.group_id.as_deref())?.birthdays;
        let today = query.today.unwrap_or_else(|| Local::now().date_naive());
        Ok(UpcomingBirthdaysResult {
            birthdays: Self::to_sorted_entries(&birthdays, today),
        })
    }

    /// Case-insensitive substring search over names.
    ///
    /// Results stay proximity-sorted after filtering, so search composes
    /// with the upcoming view instead of reordering it.
    pub fn search_birthdays(&self, query: SearchBirthdaysQuery) -> Result<UpcomingBirthdaysResult> {
        let needle = query.query.trim().to_lowercase();
        let birthdays: Vec<DomainBirthday> = self
            .birthday_repository
            .list_birthdays()?
            .into_iter()
            .filter(|b| b.name.to_lowercase().contains(&needle))
            .collect();

        let today = query.today.unwrap_or_else(|| Local::now().date_naive());
        Ok(UpcomingBirthdaysResult {
            birthdays: Self::to_sorted_entries(&birthdays, today),
        })
    }

    fn to_sorted_entries(birthdays: &[DomainBirthday], today: NaiveDate) -> Vec<UpcomingBirthdayEntry> {
        proximity::sort_by_proximity(birthdays, today)
            .into_iter()
            .map(|birthday| {
                let days_until = proximity::days_until_next_occurrence(birthday.birthdate, today);
                let label = proximity::format_proximity_label(birthday.birthdate, days_until);
                UpcomingBirthdayEntry {
                    birthday,
                    days_until,
                    label,
                }
            })
            .collect()
    }

    /// Update an existing birthday
    pub fn update_birthday(&self, command: UpdateBirthdayCommand) -> Result<UpdateBirthdayResult> {
        info!("Updating birthday: {}", command.birthday_id);

        let mut birthday = self
            .birthday_repository
            .get_birthday(&command.birthday_id)?
            .ok_or_else(|| anyhow::anyhow!("Birthday not found: {}", command.birthday_id))?;

        if let Some(name) = command.name {
            self.validate_name(&name)?;
            birthday.name = name.trim().to_string();
        }
        if let Some(birthdate_str) = command.birthdate {
            birthday.birthdate = proximity::parse_birthdate(&birthdate_str)?;
        }
        if let Some(message) = command.message {
            birthday.message = if message.trim().is_empty() {
                None
            } else {
                Some(message)
            };
        }

        birthday.updated_at = Utc::now();
        self.birthday_repository.update_birthday(&birthday)?;

        info!("Updated birthday: {} with ID: {}", birthday.name, birthday.id);
        Ok(UpdateBirthdayResult { birthday })
    }

    /// Delete a birthday
    pub fn delete_birthday(&self, birthday_id: &str) -> Result<DeleteBirthdayResult> {
        info!("Deleting birthday: {}", birthday_id);

        if !self.birthday_repository.delete_birthday(birthday_id)? {
            return Err(anyhow::anyhow!("Birthday not found: {}", birthday_id));
        }

        Ok(DeleteBirthdayResult {
            success_message: format!("Birthday '{}' deleted successfully", birthday_id),
        })
    }

    fn validate_name(&self, name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(anyhow::anyhow!("Birthday name cannot be empty"));
        }
        if name.len() > 100 {
            return Err(anyhow::anyhow!("Birthday name cannot exceed 100 characters"));
        }
        Ok(())
    }
}
