//! Outbound email provider configuration

use serde::{Deserialize, Serialize};

/// Configuration for the HTTP email delivery provider
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmailConfig {
    /// Provider API endpoint for sending mail
    pub api_url: String,

    /// Provider API key (bearer token)
    pub api_key: String,

    /// Sender address, e.g. `"FormAI" <cs@mzed.studio>`
    pub from_address: String,

    /// Hard timeout for outbound requests in seconds
    pub request_timeout_secs: u64,

    /// Use the console-logging mock service instead of a real provider
    pub use_mock: bool,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            api_url: String::from("https://api.resend.com/emails"),
            api_key: String::new(),
            from_address: String::from("\"FormAI\" <cs@mzed.studio>"),
            request_timeout_secs: default_request_timeout(),
            use_mock: true,
        }
    }
}

impl EmailConfig {
    /// Create from environment variables
    ///
    /// When `EMAIL_API_KEY` is absent the mock service is selected so local
    /// development does not require provider credentials.
    pub fn from_env() -> Self {
        let api_key = std::env::var("EMAIL_API_KEY").unwrap_or_default();
        let use_mock = std::env::var("EMAIL_USE_MOCK")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(api_key.is_empty());

        Self {
            api_url: std::env::var("EMAIL_API_URL")
                .unwrap_or_else(|_| "https://api.resend.com/emails".to_string()),
            api_key,
            from_address: std::env::var("EMAIL_FROM_ADDRESS")
                .unwrap_or_else(|_| "\"FormAI\" <cs@mzed.studio>".to_string()),
            request_timeout_secs: std::env::var("EMAIL_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_request_timeout),
            use_mock,
        }
    }
}

fn default_request_timeout() -> u64 {
    120
}
