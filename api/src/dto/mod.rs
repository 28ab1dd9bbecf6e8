//! Request and response data transfer objects

pub mod auth;

pub use auth::{PasswordResetRequest, RegisterRequest, SendCodeRequest, SignInRequest};
