//! API response structures
//!
//! The wire contract is deliberately small: success responses are
//! `{"success": true}` (optionally with a data payload) and error responses
//! are `{"error": "<human-readable message>"}`.

use serde::{Deserialize, Serialize};

/// Success envelope returned by auth endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSuccess {
    pub success: bool,
}

impl ApiSuccess {
    pub fn new() -> Self {
        Self { success: true }
    }
}

impl Default for ApiSuccess {
    fn default() -> Self {
        Self::new()
    }
}

/// Error envelope returned by auth endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
