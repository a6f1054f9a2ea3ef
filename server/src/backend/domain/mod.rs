//! # Domain Module
//!
//! Contains all business logic for the birthday tracker application.
//!
//! This module encapsulates the core business rules, entities, and services
//! that define how birthdays are modeled, evaluated for proximity, and
//! notified. It operates independently of any specific transport or storage
//! mechanism.
//!
//! ## Module Organization
//!
//! - **proximity**: Days-until calculations, window checks, sorting, labels
//! - **birthday_service**: Birthday CRUD, upcoming lists, and search
//! - **group_service**: Group CRUD with cascading delete
//! - **user_service**: User registration and group membership
//! - **notification_service**: The periodic notify-once sweep
//! - **email_service**: SMTP delivery behind the `MailSender` trait
//!
//! ## Key Business Rules
//!
//! - A birthday recurs annually; only its month and day drive scheduling
//! - A birthday is "upcoming" when its next occurrence is within the window
//! - Each birthday is notified at most once per annual cycle
//! - Deleting a group deletes its birthdays and detaches its members

pub mod birthday_service;
pub mod commands;
pub mod email_service;
pub mod errors;
pub mod group_service;
pub mod models;
pub mod notification_service;
pub mod proximity;
pub mod user_service;

pub use birthday_service::BirthdayService;
pub use email_service::{EmailConfig, EmailService, MailSender};
pub use errors::SweepError;
pub use group_service::GroupService;
pub use notification_service::NotificationService;
pub use user_service::UserService;
