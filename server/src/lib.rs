//! Birthday tracker server library.
//!
//! The binary in `main.rs` wires the backend together; everything else lives
//! under [`backend`] so it can be exercised directly from tests.

pub mod backend;
