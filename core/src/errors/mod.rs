//! Domain-specific error types and error handling.
//!
//! The taxonomy deliberately collapses several distinct failure causes into
//! single variants where distinguishing them would leak information:
//! `InvalidOrExpiredOtp` covers wrong, expired, consumed, and unknown codes
//! alike, and `InvalidCredentials` never says which of email or password was
//! wrong. The one intentional exception is `AlreadyExists`, whose message
//! names the OAuth provider when the account is provider-linked; the user
//! asserted the email as theirs by starting the flow, so this is a product
//! choice, not a leak.

use thiserror::Error;

/// Core domain errors
#[derive(Error, Debug)]
pub enum DomainError {
    /// Malformed input; one message per unmet rule
    #[error("{}", .messages.join(", "))]
    Validation { messages: Vec<String> },

    /// No user for the given email where one is required
    #[error("No account found with this email address.")]
    UserNotFound,

    /// Duplicate registration attempt; message is provider-aware
    #[error("{}", already_exists_message(.oauth_provider.as_deref()))]
    AlreadyExists { oauth_provider: Option<String> },

    /// Generic negative OTP result; never distinguishes wrong from expired
    /// from unknown
    #[error("Invalid or expired OTP.")]
    InvalidOrExpiredOtp,

    /// Sign-in failure; identical for every failure path
    #[error("Please enter correct email and password.")]
    InvalidCredentials,

    /// The notifier could not deliver the code
    #[error("Failed to send OTP")]
    EmailDelivery { message: String },

    /// Store unavailable or a query failed; retryable, logged with full
    /// detail server-side
    #[error("Failed to process request")]
    Database { message: String },
}

impl DomainError {
    /// Single-message validation error
    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation {
            messages: vec![message.into()],
        }
    }
}

fn already_exists_message(provider: Option<&str>) -> String {
    match provider {
        Some(p) => {
            let display = capitalize(p);
            format!(
                "You have already signed up with {}. Please sign in using {}.",
                display, display
            )
        }
        None => "User already exists. Please sign in with your Email and password.".to_string(),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages_joined() {
        let error = DomainError::Validation {
            messages: vec![
                "Password must be at least 8 characters".to_string(),
                "Password must contain at least one number".to_string(),
            ],
        };
        assert_eq!(
            error.to_string(),
            "Password must be at least 8 characters, Password must contain at least one number"
        );
    }

    #[test]
    fn test_already_exists_provider_aware() {
        let error = DomainError::AlreadyExists {
            oauth_provider: Some("google".to_string()),
        };
        assert_eq!(
            error.to_string(),
            "You have already signed up with Google. Please sign in using Google."
        );

        let error = DomainError::AlreadyExists {
            oauth_provider: None,
        };
        assert_eq!(
            error.to_string(),
            "User already exists. Please sign in with your Email and password."
        );
    }

    #[test]
    fn test_generic_otp_error_is_nonspecific() {
        // Wrong, expired, consumed, and unknown codes must all read the same
        assert_eq!(DomainError::InvalidOrExpiredOtp.to_string(), "Invalid or expired OTP.");
    }

    #[test]
    fn test_database_error_hides_detail() {
        let error = DomainError::Database {
            message: "connection refused to mysql://...".to_string(),
        };
        assert_eq!(error.to_string(), "Failed to process request");
    }
}
