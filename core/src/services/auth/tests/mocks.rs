//! Mock email service for auth service tests

use async_trait::async_trait;
use std::sync::Mutex;

use crate::domain::entities::otp::OtpPurpose;
use crate::services::otp::EmailServiceTrait;

/// Mock email service capturing sent codes
pub(crate) struct MockEmailService {
    sent: Mutex<Vec<(String, String, OtpPurpose)>>,
}

impl MockEmailService {
    pub(crate) fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Last code sent to the given address, if any
    pub(crate) fn last_code_for(&self, email: &str) -> Option<String> {
        let sent = self.sent.lock().unwrap();
        sent.iter()
            .rev()
            .find(|(to, _, _)| to == email)
            .map(|(_, code, _)| code.clone())
    }

    pub(crate) fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
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
        let mut sent = self.sent.lock().unwrap();
        sent.push((email.to_string(), code.to_string(), purpose));
        Ok(format!("mock-msg-{}", sent.len()))
    }
}
