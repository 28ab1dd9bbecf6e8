//! OTP service configuration

use crate::domain::entities::otp::DEFAULT_EXPIRATION_MINUTES;

/// Configuration for the OTP lifecycle service
#[derive(Debug, Clone)]
pub struct OtpServiceConfig {
    /// Minutes before an issued code expires; fixed at issuance
    pub expiration_minutes: i64,

    /// Accept any code without consulting the store. Every use is logged at
    /// WARN level. Intended for development only; the configuration layer
    /// refuses to enable it in production.
    pub auto_verify: bool,
}

impl Default for OtpServiceConfig {
    fn default() -> Self {
        Self {
            expiration_minutes: DEFAULT_EXPIRATION_MINUTES,
            auto_verify: false,
        }
    }
}

impl From<&fa_shared::config::AuthConfig> for OtpServiceConfig {
    fn from(config: &fa_shared::config::AuthConfig) -> Self {
        Self {
            expiration_minutes: config.otp_expiration_minutes,
            auto_verify: config.auto_verify_otp,
        }
    }
}
