//! OTP lifecycle service
//!
//! Owns creation, invalidation, and verification of one-time passcodes,
//! decoupling "is this code valid right now" from "has this identity already
//! registered".

mod config;
mod service;
mod traits;
mod types;

#[cfg(test)]
mod tests;

pub use config::OtpServiceConfig;
pub use service::OtpService;
pub use traits::EmailServiceTrait;
pub use types::{is_valid_code_shape, ExistenceCheck, IssueOtpResult, VerifyOtpResult};
