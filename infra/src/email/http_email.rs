//! HTTP email provider client
//!
//! Sends OTP mail through a Resend-style JSON API: one POST per message,
//! bearer authentication, and a provider-assigned message id in the
//! response. The request carries a hard timeout so a slow provider fails
//! the send instead of holding the caller open.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info};

use fa_core::domain::entities::otp::OtpPurpose;
use fa_core::services::otp::EmailServiceTrait;
use fa_shared::config::EmailConfig;
use fa_shared::utils::email::mask_email;

use crate::email::template;
use crate::InfrastructureError;

/// Outbound message payload
#[derive(Debug, Serialize)]
struct SendMailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: String,
}

/// Provider response, of which only the message id matters
#[derive(Debug, Deserialize)]
struct SendMailResponse {
    id: String,
}

/// HTTP email service implementation
pub struct HttpEmailService {
    client: reqwest::Client,
    config: EmailConfig,
    /// Validity window quoted in the message body, in minutes
    code_valid_minutes: i64,
}

impl HttpEmailService {
    /// Create a new HTTP email service
    pub fn new(config: EmailConfig, code_valid_minutes: i64) -> Result<Self, InfrastructureError> {
        if config.api_key.is_empty() {
            return Err(InfrastructureError::Config(
                "EMAIL_API_KEY not set".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(InfrastructureError::Http)?;

        info!(
            api_url = %config.api_url,
            from = %config.from_address,
            "HTTP email service initialized"
        );

        Ok(Self {
            client,
            config,
            code_valid_minutes,
        })
    }
}

#[async_trait]
impl EmailServiceTrait for HttpEmailService {
    async fn send_otp_email(
        &self,
        email: &str,
        code: &str,
        purpose: OtpPurpose,
    ) -> Result<String, String> {
        let payload = SendMailRequest {
            from: &self.config.from_address,
            to: [email],
            subject: template::subject(purpose),
            html: template::html_body(code, self.code_valid_minutes),
        };

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                error!(
                    email = %mask_email(email),
                    error = %e,
                    "Email provider request failed"
                );
                format!("Email provider request failed: {}", e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(
                email = %mask_email(email),
                status = %status,
                body = %body,
                "Email provider rejected the message"
            );
            return Err(format!("Email provider returned {}", status));
        }

        let parsed: SendMailResponse = response
            .json()
            .await
            .map_err(|e| format!("Invalid email provider response: {}", e))?;

        info!(
            email = %mask_email(email),
            purpose = %purpose,
            message_id = %parsed.id,
            "OTP email accepted by provider"
        );
        Ok(parsed.id)
    }
}
