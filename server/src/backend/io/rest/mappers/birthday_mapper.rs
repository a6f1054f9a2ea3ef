//! server/src/backend/io/rest/mappers/birthday_mapper.rs

use crate::backend::domain::commands::birthday::UpcomingBirthdayEntry;
use crate::backend::domain::models::birthday::Birthday as DomainBirthday;
use shared::{Birthday as SharedBirthday, BirthdayListResponse, UpcomingBirthday, UpcomingBirthdaysResponse};

/// Mapper to convert between shared Birthday DTOs and domain Birthday models.
pub struct BirthdayMapper;

impl BirthdayMapper {
    /// Converts a domain Birthday model to a shared Birthday DTO.
    pub fn to_dto(domain: DomainBirthday) -> SharedBirthday {
        SharedBirthday {
            id: domain.id,
            name: domain.name,
            birthdate: domain.birthdate,
            message: domain.message,
            group_id: domain.group_id,
            notified: domain.notified,
        }
    }

    pub fn to_list_dto(domain_birthdays: Vec<DomainBirthday>) -> BirthdayListResponse {
        BirthdayListResponse {
            birthdays: domain_birthdays.into_iter().map(Self::to_dto).collect(),
        }
    }

    pub fn to_upcoming_dto(entries: Vec<UpcomingBirthdayEntry>) -> UpcomingBirthdaysResponse {
        UpcomingBirthdaysResponse {
            birthdays: entries
                .into_iter()
                .map(|entry| UpcomingBirthday {
                    id: entry.birthday.id,
                    name: entry.birthday.name,
                    birthdate: entry.birthday.birthdate,
                    message: entry.birthday.message,
                    group_id: entry.birthday.group_id,
                    days_until: entry.days_until,
                    label: entry.label,
                })
                .collect(),
        }
    }
}
