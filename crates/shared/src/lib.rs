//! Shared types, errors, and configuration for Khata.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - The system service principal used for audit fields
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod principal;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use principal::Principal;
