//! Mock email service
//!
//! Logs OTP mail to the console instead of sending it. Used in local
//! development (no provider credentials needed) and in integration tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use fa_core::domain::entities::otp::OtpPurpose;
use fa_core::services::otp::EmailServiceTrait;
use fa_shared::utils::email::mask_email;

/// Mock email service for development and testing
#[derive(Clone)]
pub struct MockEmailService {
    /// Counter of messages sent, for assertions
    message_count: Arc<AtomicU64>,
    /// Whether to simulate delivery failure
    simulate_failure: bool,
}

impl MockEmailService {
    /// Create a new mock email service
    pub fn new() -> Self {
        Self {
            message_count: Arc::new(AtomicU64::new(0)),
            simulate_failure: false,
        }
    }

    /// Create a mock that fails every send
    pub fn failing() -> Self {
        Self {
            message_count: Arc::new(AtomicU64::new(0)),
            simulate_failure: true,
        }
    }

    /// Total number of messages accepted
    pub fn message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }
}

impl Default for MockEmailService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmailServiceTrait for MockEmailService {
    async fn send_otp_email(
        &self,
        email: &str,
        code: &str,
        purpose: OtpPurpose,
    ) -> Result<String, String> {
        if self.simulate_failure {
            warn!(
                email = %mask_email(email),
                "Mock email service simulating delivery failure"
            );
            return Err("Simulated email delivery failure".to_string());
        }

        let message_id = format!("mock-{}", Uuid::new_v4());
        self.message_count.fetch_add(1, Ordering::SeqCst);

        // The full address and code are printed on purpose; this service
        // never runs in production
        info!(
            email = %email,
            code = %code,
            purpose = %purpose,
            message_id = %message_id,
            "MOCK EMAIL: OTP code"
        );
        Ok(message_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_returns_message_id_and_counts() {
        let service = MockEmailService::new();
        let id = service
            .send_otp_email("user@example.com", "123456", OtpPurpose::Registration)
            .await
            .unwrap();
        assert!(id.starts_with("mock-"));
        assert_eq!(service.message_count(), 1);
    }

    #[tokio::test]
    async fn test_failing_mock_rejects_send() {
        let service = MockEmailService::failing();
        let result = service
            .send_otp_email("user@example.com", "123456", OtpPurpose::Registration)
            .await;
        assert!(result.is_err());
        assert_eq!(service.message_count(), 0);
    }
}
