//! server/src/backend/io/rest/mappers/user_mapper.rs

use crate::backend::domain::models::user::{User as DomainUser, UserRole as DomainUserRole};
use shared::{GroupMembersResponse, User as SharedUser, UserRole as SharedUserRole};

/// Mapper to convert between shared User DTOs and domain User models.
pub struct UserMapper;

impl UserMapper {
    pub fn role_to_domain(role: SharedUserRole) -> DomainUserRole {
        match role {
            SharedUserRole::Admin => DomainUserRole::Admin,
            SharedUserRole::GroupLeader => DomainUserRole::GroupLeader,
            SharedUserRole::Member => DomainUserRole::Member,
        }
    }

    pub fn role_to_dto(role: DomainUserRole) -> SharedUserRole {
        match role {
            DomainUserRole::Admin => SharedUserRole::Admin,
            DomainUserRole::GroupLeader => SharedUserRole::GroupLeader,
            DomainUserRole::Member => SharedUserRole::Member,
        }
    }

    /// Converts a domain User model to a shared User DTO.
    pub fn to_dto(domain: DomainUser) -> SharedUser {
        SharedUser {
            id: domain.id,
            email: domain.email,
            role: Self::role_to_dto(domain.role),
            group_id: domain.group_id,
        }
    }

    pub fn to_members_dto(domain_users: Vec<DomainUser>) -> GroupMembersResponse {
        GroupMembersResponse {
            members: domain_users.into_iter().map(Self::to_dto).collect(),
        }
    }
}
