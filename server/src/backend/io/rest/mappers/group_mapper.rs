//! server/src/backend/io/rest/mappers/group_mapper.rs

use crate::backend::domain::commands::group::DeleteGroupResult;
use crate::backend::domain::models::group::Group as DomainGroup;
use shared::{DeleteGroupResponse, Group as SharedGroup, GroupListResponse};

/// Mapper to convert between shared Group DTOs and domain Group models.
pub struct GroupMapper;

impl GroupMapper {
    /// Converts a domain Group model to a shared Group DTO.
    pub fn to_dto(domain: DomainGroup) -> SharedGroup {
        SharedGroup {
            id: domain.id,
            name: domain.name,
            description: domain.description,
        }
    }

    pub fn to_list_dto(domain_groups: Vec<DomainGroup>) -> GroupListResponse {
        GroupListResponse {
            groups: domain_groups.into_iter().map(Self::to_dto).collect(),
        }
    }

    pub fn to_delete_dto(result: DeleteGroupResult) -> DeleteGroupResponse {
        DeleteGroupResponse {
            deleted_birthdays: result.deleted_birthdays,
            detached_members: result.detached_members,
            success_message: result.success_message,
        }
    }
}
