//! Shared utilities and common types for the FormAI server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types
//! - Common response structures
//! - Utility functions (email normalization, masking)

pub mod config;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{AppConfig, AuthConfig, DatabaseConfig, EmailConfig, Environment, ServerConfig};
pub use types::response::{ApiError, ApiSuccess};
pub use utils::email;
