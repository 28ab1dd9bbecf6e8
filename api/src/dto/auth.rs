use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body for POST /api/v1/auth/register/send-code
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendCodeRequest {
    /// Email address the code is sent to
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,

    /// Intended password; validated up front so the user learns about a
    /// policy violation before checking their inbox
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Body for POST /api/v1/auth/register
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// 6-digit verification code
    #[validate(length(equal = 6, message = "OTP must be 6 digits"))]
    pub otp: String,
}

/// Body for POST /api/v1/auth/password
///
/// One endpoint drives all three reset steps; `otp` is required from step 2
/// and `new_password` only at step 3.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PasswordResetRequest {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,

    /// Protocol step: 1 = request code, 2 = pre-check code, 3 = commit
    pub step: u8,

    pub otp: Option<String>,

    #[serde(rename = "newPassword")]
    pub new_password: Option<String>,
}

/// Body for POST /api/v1/auth/sign-in
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SignInRequest {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}
