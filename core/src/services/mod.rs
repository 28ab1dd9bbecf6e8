//! Business services containing domain logic and use cases.

pub mod auth;
pub mod otp;

// Re-export commonly used types
pub use auth::{AuthService, AuthServiceConfig};
pub use otp::{
    EmailServiceTrait, ExistenceCheck, IssueOtpResult, OtpService, OtpServiceConfig,
    VerifyOtpResult,
};
