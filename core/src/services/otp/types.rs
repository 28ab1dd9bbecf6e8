//! Result and policy types for the OTP lifecycle service

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::otp::CODE_LENGTH;

/// Policy governing whether an OTP may be issued based on whether the target
/// email already belongs to a registered user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExistenceCheck {
    /// Fail when a user exists (registration)
    Prevent,
    /// Fail when no user exists (password reset)
    Require,
    /// No existence check (email re-verification)
    None,
}

/// Outcome of a successful `issue` call
///
/// Deliberately excludes the code itself: the code travels out of band only.
#[derive(Debug, Clone)]
pub struct IssueOtpResult {
    /// Identifier of the freshly created pending record
    pub otp_id: Uuid,

    /// When the issued code expires
    pub expires_at: DateTime<Utc>,

    /// Provider message id from the notifier
    pub message_id: String,
}

/// Outcome of a `verify` call
///
/// A negative outcome is a normal result, not an error, and always carries
/// the same generic message.
#[derive(Debug, Clone)]
pub struct VerifyOtpResult {
    /// Whether the code was accepted
    pub verified: bool,

    /// Identifier of the verified record; `None` on the auto-verify path
    /// when no record exists
    pub otp_id: Option<Uuid>,

    /// Generic message on the negative path
    pub message: Option<String>,
}

impl VerifyOtpResult {
    pub(crate) fn accepted(otp_id: Option<Uuid>) -> Self {
        Self {
            verified: true,
            otp_id,
            message: None,
        }
    }

    pub(crate) fn rejected() -> Self {
        Self {
            verified: false,
            otp_id: None,
            message: Some(crate::errors::DomainError::InvalidOrExpiredOtp.to_string()),
        }
    }
}

/// Check that a submitted code has the right shape: exactly six ASCII digits
pub fn is_valid_code_shape(code: &str) -> bool {
    code.len() == CODE_LENGTH && code.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_shape() {
        assert!(is_valid_code_shape("012345"));
        assert!(!is_valid_code_shape("12345"));
        assert!(!is_valid_code_shape("1234567"));
        assert!(!is_valid_code_shape("12a456"));
        assert!(!is_valid_code_shape(""));
    }
}
