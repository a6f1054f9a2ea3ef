//! Domain models for the birthday tracker.

pub mod birthday;
pub mod group;
pub mod user;
