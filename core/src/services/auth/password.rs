//! Password complexity policy and hashing

use crate::errors::{DomainError, DomainResult};

/// Minimum password length
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Validate a password against the complexity policy.
///
/// Returns every unmet rule as its own message so the client can present the
/// full list at once.
pub fn validate_password_complexity(password: &str) -> Result<(), Vec<String>> {
    let mut messages = Vec::new();

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        messages.push("Password must be at least 8 characters".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        messages.push("Password must contain at least one uppercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        messages.push("Password must contain at least one lowercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        messages.push("Password must contain at least one number".to_string());
    }
    if !password.chars().any(|c| !c.is_ascii_alphanumeric()) {
        messages.push("Password must contain at least one special character".to_string());
    }

    if messages.is_empty() {
        Ok(())
    } else {
        Err(messages)
    }
}

/// Hash a password with bcrypt at the given cost factor
pub fn hash_password(password: &str, cost: u32) -> DomainResult<String> {
    bcrypt::hash(password, cost).map_err(|e| DomainError::Database {
        message: format!("Password hashing failed: {}", e),
    })
}

/// Check a password against a stored bcrypt hash
///
/// A malformed stored hash reads as a mismatch; sign-in must not behave
/// differently for corrupt rows.
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}
