//! # IO Module
//!
//! Provides the interface layer between clients and the domain logic.
//!
//! This module translates HTTP requests into domain operations and formats
//! domain responses for client consumption. It handles the communication
//! protocol (REST API), serialization, and maintains the boundary between
//! the transport layer and business logic.
//!
//! ## Current Implementation
//!
//! - **Web Framework**: Axum for async HTTP handling
//! - **Serialization**: Serde for JSON request/response handling
//! - **State Management**: Axum extractors for dependency injection
//! - **Error Handling**: Structured error responses with appropriate HTTP codes

pub mod rest;
