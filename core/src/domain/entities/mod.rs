//! Domain entities representing core business objects.

pub mod otp;
pub mod user;

// Re-export commonly used types
pub use otp::{OtpPurpose, OtpRecord, OtpStatus, CODE_LENGTH, DEFAULT_EXPIRATION_MINUTES};
pub use user::{OauthAccount, User};
