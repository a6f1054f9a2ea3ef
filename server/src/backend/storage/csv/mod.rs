//! # File-backed Storage Module
//!
//! CSV/YAML storage implementation for the birthday tracker. Earlier
//! revisions of this application carried several competing backends
//! (in-memory, SQL, ORM); the domain layer now talks to the storage traits
//! only, and this module is the one shipped implementation.
//!
//! ## Layout
//!
//! ```text
//! <data dir>/
//!   users.yaml          all registered users
//!   <group_dir>/        one directory per group, named from the group name
//!     group.yaml        group metadata
//!     birthdays.csv     that group's birthdays
//! ```
//!
//! All writes go through atomic tmp-file renames and are serialized by the
//! connection's write lock.

pub mod birthday_repository;
pub mod connection;
pub mod group_repository;
pub mod user_repository;

pub use birthday_repository::BirthdayRepository;
pub use connection::CsvConnection;
pub use group_repository::GroupRepository;
pub use user_repository::UserRepository;
