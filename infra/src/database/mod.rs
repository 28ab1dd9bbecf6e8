//! Database module - MySQL implementations using SQLx
//!
//! Provides connection pool management and the repository implementations,
//! including the transactional commit operations the auth flows rely on.

pub mod connection;
pub mod mysql;

// Re-export commonly used types
pub use connection::DatabasePool;
pub use mysql::{MySqlOtpRepository, MySqlUserRepository};
