//! Authentication route handlers
//!
//! - Registration (send code, commit with code)
//! - Password reset (single endpoint, three steps)
//! - Sign-in

pub mod password_reset;
pub mod register;
pub mod sign_in;

use std::sync::Arc;

use fa_core::repositories::{OtpRepository, UserRepository};
use fa_core::services::auth::AuthService;
use fa_core::services::otp::EmailServiceTrait;

/// Application state holding the shared auth service
pub struct AppState<U, O, E>
where
    U: UserRepository,
    O: OtpRepository,
    E: EmailServiceTrait,
{
    pub auth_service: Arc<AuthService<U, O, E>>,
}
