//! DTO mappers between the `shared` API types and domain models.

pub mod birthday_mapper;
pub mod group_mapper;
pub mod user_mapper;

pub use birthday_mapper::BirthdayMapper;
pub use group_mapper::GroupMapper;
pub use user_mapper::UserMapper;
