//! # REST API Interface Layer
//!
//! Provides HTTP REST endpoints for the birthday tracker application.
//! This layer handles:
//! - HTTP request/response serialization and deserialization
//! - Input validation and sanitization
//! - Error translation from domain to HTTP status codes
//! - Request logging and monitoring
//!
//! ## Design Principles
//!
//! - **REST Compliance**: Following RESTful design patterns
//! - **Error Transparency**: Clear error messages for debugging
//! - **Domain Separation**: Pure translation layer without business logic

pub mod birthday_apis;
pub mod group_apis;
pub mod mappers;
pub mod user_apis;
