//! Repository interfaces and in-memory mock implementations.

pub mod otp;
pub mod user;

pub use otp::{MockOtpRepository, OtpRepository, SharedOtpStore};
pub use user::{MockUserRepository, UserRepository};
