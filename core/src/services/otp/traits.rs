//! Traits for email delivery integration

use async_trait::async_trait;

use crate::domain::entities::otp::OtpPurpose;

/// Trait for the out-of-band email notifier
///
/// Implementations must bound the outbound request with a hard timeout; a
/// slow provider fails the send rather than holding the request open.
#[async_trait]
pub trait EmailServiceTrait: Send + Sync {
    /// Deliver a one-time passcode to the given address.
    ///
    /// Returns a provider message id on success, an error description on
    /// failure. Failure is fatal to the enclosing `issue` call.
    async fn send_otp_email(
        &self,
        email: &str,
        code: &str,
        purpose: OtpPurpose,
    ) -> Result<String, String>;
}
