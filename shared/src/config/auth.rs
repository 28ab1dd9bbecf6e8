//! OTP and password hashing configuration

use serde::{Deserialize, Serialize};

use super::environment::Environment;

/// Authentication configuration: OTP lifetime, password hashing cost,
/// and the development-only auto-verify switch.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Minutes before an issued OTP expires
    pub otp_expiration_minutes: i64,

    /// bcrypt cost factor for password hashing
    pub bcrypt_cost: u32,

    /// Accept any OTP without checking the store.
    ///
    /// An explicit flag rather than an environment sniff so the behavior is
    /// testable and visible in configuration. Refused in production.
    pub auto_verify_otp: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            otp_expiration_minutes: 10,
            bcrypt_cost: 10,
            auto_verify_otp: false,
        }
    }
}

impl AuthConfig {
    /// Create from environment variables
    ///
    /// `AUTH_AUTO_VERIFY_OTP=1` is ignored in production: auto-verify must
    /// never reach a production build silently.
    pub fn from_env(environment: Environment) -> Self {
        let auto_verify_requested = std::env::var("AUTH_AUTO_VERIFY_OTP")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Self {
            otp_expiration_minutes: std::env::var("AUTH_OTP_EXPIRATION_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            bcrypt_cost: std::env::var("AUTH_BCRYPT_COST")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            auto_verify_otp: auto_verify_requested && !environment.is_production(),
        }
    }
}
