//! # Infrastructure Layer
//!
//! Concrete implementations of the persistence and delivery interfaces
//! defined in `fa_core`:
//!
//! - **Database**: MySQL repositories using SQLx, including the
//!   transactional commit operations of the registration and reset flows
//! - **Email**: HTTP email provider client and a console-logging mock

pub mod database;
pub mod email;

// Re-export commonly used types
pub use database::{DatabasePool, MySqlOtpRepository, MySqlUserRepository};
pub use email::{HttpEmailService, MockEmailService};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection or query error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// HTTP request error for the email provider
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Email delivery error
    #[error("Email delivery error: {0}")]
    Email(String),
}
