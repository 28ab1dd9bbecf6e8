//! OTP record entity for email-based verification flows.

use chrono::{DateTime, Duration, Utc};
use rand::{rngs::OsRng, Rng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Length of the one-time passcode
pub const CODE_LENGTH: usize = 6;

/// Default expiration time for OTP codes (10 minutes)
pub const DEFAULT_EXPIRATION_MINUTES: i64 = 10;

/// Purpose a one-time passcode was issued for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OtpPurpose {
    /// Account registration
    Registration,
    /// Password reset
    PasswordReset,
    /// Re-verification of an email address on an existing account
    EmailVerification,
}

impl OtpPurpose {
    /// Stable string form used in the database and on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            OtpPurpose::Registration => "registration",
            OtpPurpose::PasswordReset => "password-reset",
            OtpPurpose::EmailVerification => "email-verification",
        }
    }
}

impl std::fmt::Display for OtpPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OtpPurpose {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "registration" => Ok(OtpPurpose::Registration),
            "password-reset" => Ok(OtpPurpose::PasswordReset),
            "email-verification" => Ok(OtpPurpose::EmailVerification),
            _ => Err(format!("Unknown OTP purpose: {}", s)),
        }
    }
}

/// Lifecycle status of an OTP record
///
/// Transitions are forward-only:
/// `pending -> verified -> used`, with `pending|verified -> expired` when a
/// newer code supersedes the record or its window elapses. `used` and
/// `expired` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OtpStatus {
    Pending,
    Verified,
    Used,
    Expired,
}

impl OtpStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OtpStatus::Pending => "pending",
            OtpStatus::Verified => "verified",
            OtpStatus::Used => "used",
            OtpStatus::Expired => "expired",
        }
    }

    /// Terminal statuses admit no further transition
    pub fn is_terminal(&self) -> bool {
        matches!(self, OtpStatus::Used | OtpStatus::Expired)
    }
}

impl std::str::FromStr for OtpStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OtpStatus::Pending),
            "verified" => Ok(OtpStatus::Verified),
            "used" => Ok(OtpStatus::Used),
            "expired" => Ok(OtpStatus::Expired),
            _ => Err(format!("Unknown OTP status: {}", s)),
        }
    }
}

/// OTP record entity for email-based verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpRecord {
    /// Unique identifier for the record
    pub id: Uuid,

    /// Normalized email address this code was sent to
    pub email: String,

    /// The 6-digit code, zero-padded
    pub code: String,

    /// Purpose the code was issued for
    pub purpose: OtpPurpose,

    /// Current lifecycle status
    pub status: OtpStatus,

    /// Timestamp when the record was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the code expires; fixed at creation, never extended
    pub expires_at: DateTime<Utc>,
}

impl OtpRecord {
    /// Creates a new pending OTP record with a random 6-digit code
    pub fn new(email: String, purpose: OtpPurpose) -> Self {
        Self::new_with_expiration(email, purpose, DEFAULT_EXPIRATION_MINUTES)
    }

    /// Creates a new pending OTP record with a custom expiration window
    pub fn new_with_expiration(email: String, purpose: OtpPurpose, expiration_minutes: i64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            code: Self::generate_code(),
            purpose,
            status: OtpStatus::Pending,
            created_at: now,
            expires_at: now + Duration::minutes(expiration_minutes),
        }
    }

    /// Generates a random 6-digit code, uniform over 000000-999999
    ///
    /// Uses the OS CSPRNG.
    pub fn generate_code() -> String {
        let code: u32 = OsRng.gen_range(0..1_000_000);
        format!("{:06}", code)
    }

    /// Checks if the code's expiry timestamp has passed
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// A record can satisfy a verification check while pending or
    /// verified, and unexpired
    pub fn is_consumable(&self) -> bool {
        matches!(self.status, OtpStatus::Pending | OtpStatus::Verified) && !self.is_expired()
    }

    /// Transition `pending -> verified`
    pub fn mark_verified(&mut self) -> Result<(), String> {
        match self.status {
            OtpStatus::Pending => {
                self.status = OtpStatus::Verified;
                Ok(())
            }
            other => Err(format!("Cannot verify OTP in status {}", other.as_str())),
        }
    }

    /// Transition `pending|verified -> used`
    pub fn mark_used(&mut self) -> Result<(), String> {
        match self.status {
            OtpStatus::Pending | OtpStatus::Verified => {
                self.status = OtpStatus::Used;
                Ok(())
            }
            other => Err(format!("Cannot consume OTP in status {}", other.as_str())),
        }
    }

    /// Transition `pending|verified -> expired`
    pub fn mark_expired(&mut self) -> Result<(), String> {
        match self.status {
            OtpStatus::Pending | OtpStatus::Verified => {
                self.status = OtpStatus::Expired;
                Ok(())
            }
            other => Err(format!("Cannot expire OTP in status {}", other.as_str())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_otp_record() {
        let record = OtpRecord::new("user@example.com".to_string(), OtpPurpose::Registration);

        assert_eq!(record.email, "user@example.com");
        assert_eq!(record.code.len(), CODE_LENGTH);
        assert_eq!(record.status, OtpStatus::Pending);
        assert!(!record.is_expired());
        assert!(record.is_consumable());
        assert_eq!(
            record.expires_at,
            record.created_at + Duration::minutes(DEFAULT_EXPIRATION_MINUTES)
        );
    }

    #[test]
    fn test_generate_code_format() {
        for _ in 0..100 {
            let code = OtpRecord::generate_code();
            assert_eq!(code.len(), CODE_LENGTH);
            assert!(code.chars().all(|c| c.is_ascii_digit()));

            let num: u32 = code.parse().expect("Generated code should be numeric");
            assert!(num < 1_000_000);
        }
    }

    #[test]
    fn test_code_uniqueness() {
        let codes: Vec<String> = (0..100).map(|_| OtpRecord::generate_code()).collect();
        let unique_count = codes.iter().collect::<std::collections::HashSet<_>>().len();
        assert!(unique_count > 1);
    }

    #[test]
    fn test_forward_transitions() {
        let mut record = OtpRecord::new("user@example.com".to_string(), OtpPurpose::Registration);

        assert!(record.mark_verified().is_ok());
        assert_eq!(record.status, OtpStatus::Verified);

        assert!(record.mark_used().is_ok());
        assert_eq!(record.status, OtpStatus::Used);
        assert!(record.status.is_terminal());
    }

    #[test]
    fn test_no_backward_transition() {
        let mut record = OtpRecord::new("user@example.com".to_string(), OtpPurpose::PasswordReset);
        record.mark_used().unwrap();

        assert!(record.mark_verified().is_err());
        assert!(record.mark_expired().is_err());
        assert_eq!(record.status, OtpStatus::Used);
    }

    #[test]
    fn test_terminal_states_are_sticky() {
        let mut record = OtpRecord::new("user@example.com".to_string(), OtpPurpose::Registration);
        record.mark_expired().unwrap();

        assert!(record.mark_verified().is_err());
        assert!(record.mark_used().is_err());
        assert_eq!(record.status, OtpStatus::Expired);
    }

    #[test]
    fn test_expired_record_not_consumable() {
        let record = OtpRecord::new_with_expiration(
            "user@example.com".to_string(),
            OtpPurpose::PasswordReset,
            -1,
        );
        assert!(record.is_expired());
        assert!(!record.is_consumable());
    }

    #[test]
    fn test_verified_record_still_consumable() {
        // Step-3 re-checks need verified records to remain consumable
        let mut record = OtpRecord::new("user@example.com".to_string(), OtpPurpose::PasswordReset);
        record.mark_verified().unwrap();
        assert!(record.is_consumable());
    }

    #[test]
    fn test_purpose_round_trip() {
        for purpose in [
            OtpPurpose::Registration,
            OtpPurpose::PasswordReset,
            OtpPurpose::EmailVerification,
        ] {
            assert_eq!(purpose.as_str().parse::<OtpPurpose>(), Ok(purpose));
        }
        assert!("unknown".parse::<OtpPurpose>().is_err());
    }

    #[test]
    fn test_serialization() {
        let record = OtpRecord::new("user@example.com".to_string(), OtpPurpose::PasswordReset);
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("password-reset"));

        let deserialized: OtpRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, deserialized);
    }
}
