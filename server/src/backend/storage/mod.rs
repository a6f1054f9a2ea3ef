//! Storage layer: abstraction traits plus the file-backed implementation.

pub mod csv;
pub mod traits;

pub use csv::CsvConnection;
pub use traits::{BirthdayStorage, GroupStorage, UserStorage};
