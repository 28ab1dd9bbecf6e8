use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::dto::auth::{RegisterRequest, SendCodeRequest};
use crate::handlers::{domain_error_response, validation_error_response};
use crate::routes::auth::AppState;

use fa_core::repositories::{OtpRepository, UserRepository};
use fa_core::services::otp::EmailServiceTrait;
use fa_shared::types::response::ApiSuccess;
use fa_shared::utils::email::mask_email;

/// Handler for POST /api/v1/auth/register/send-code
///
/// Validates email and password, then issues a registration code. Fails
/// with 409 when the address is already registered (naming the OAuth
/// provider when that is how the account was created).
pub async fn send_code<U, O, E>(
    state: web::Data<AppState<U, O, E>>,
    request: web::Json<SendCodeRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    O: OtpRepository + 'static,
    E: EmailServiceTrait + 'static,
{
    if let Err(errors) = request.0.validate() {
        return validation_error_response(&errors);
    }

    log::info!(
        "Processing register/send-code for email: {}",
        mask_email(&request.email)
    );

    match state
        .auth_service
        .request_registration(&request.email, &request.password)
        .await
    {
        Ok(()) => HttpResponse::Ok().json(ApiSuccess::new()),
        Err(error) => domain_error_response(error),
    }
}

/// Handler for POST /api/v1/auth/register
///
/// Commits the registration: verifies the code, creates the account with a
/// verified email, and consumes the code, atomically.
pub async fn register<U, O, E>(
    state: web::Data<AppState<U, O, E>>,
    request: web::Json<RegisterRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    O: OtpRepository + 'static,
    E: EmailServiceTrait + 'static,
{
    if let Err(errors) = request.0.validate() {
        return validation_error_response(&errors);
    }

    log::info!(
        "Processing register for email: {}",
        mask_email(&request.email)
    );

    match state
        .auth_service
        .complete_registration(&request.email, &request.password, &request.otp)
        .await
    {
        Ok(()) => HttpResponse::Ok().json(ApiSuccess::new()),
        Err(error) => domain_error_response(error),
    }
}
