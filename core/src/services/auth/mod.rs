//! Registration, password-reset, and sign-in orchestration
//!
//! Sequences the request-code / verify-code / commit protocol for account
//! registration and password reset, and hosts the thin credential
//! authenticator.

mod config;
mod password;
mod service;

#[cfg(test)]
mod tests;

pub use config::AuthServiceConfig;
pub use password::{hash_password, validate_password_complexity, verify_password};
pub use service::AuthService;
