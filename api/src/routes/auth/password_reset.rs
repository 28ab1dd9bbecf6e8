use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::dto::auth::PasswordResetRequest;
use crate::handlers::{domain_error_response, validation_error_response};
use crate::routes::auth::AppState;

use fa_core::repositories::{OtpRepository, UserRepository};
use fa_core::services::otp::EmailServiceTrait;
use fa_shared::types::response::{ApiError, ApiSuccess};
use fa_shared::utils::email::mask_email;

/// Handler for POST /api/v1/auth/password
///
/// Stateless three-step reset protocol on one endpoint:
/// - step 1: send a reset code to the address,
/// - step 2: non-destructive pre-check of the submitted code,
/// - step 3: re-check the code and commit the new password.
///
/// The whole endpoint 404s for unknown addresses before any step runs.
pub async fn password_reset<U, O, E>(
    state: web::Data<AppState<U, O, E>>,
    request: web::Json<PasswordResetRequest>,
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
        "Processing password reset step {} for email: {}",
        request.step,
        mask_email(&request.email)
    );

    // Existence gate ahead of step dispatch
    match state.auth_service.user_exists(&request.email).await {
        Ok(true) => {}
        Ok(false) => {
            return HttpResponse::NotFound().json(ApiError::new("User does not exist."));
        }
        Err(error) => return domain_error_response(error),
    }

    let result = match request.step {
        1 => state.auth_service.reset_step1(&request.email).await,
        2 => {
            let otp = match request.otp.as_deref() {
                Some(otp) => otp,
                None => {
                    return HttpResponse::BadRequest().json(ApiError::new("OTP is required."));
                }
            };
            state.auth_service.reset_step2(&request.email, otp).await
        }
        3 => {
            let otp = match request.otp.as_deref() {
                Some(otp) => otp,
                None => {
                    return HttpResponse::BadRequest().json(ApiError::new("OTP is required."));
                }
            };
            let new_password = match request.new_password.as_deref() {
                Some(password) => password,
                None => {
                    return HttpResponse::BadRequest()
                        .json(ApiError::new("New password is required."));
                }
            };
            state
                .auth_service
                .reset_step3(&request.email, otp, new_password)
                .await
        }
        _ => {
            return HttpResponse::BadRequest().json(ApiError::new("Invalid step"));
        }
    };

    match result {
        Ok(()) => HttpResponse::Ok().json(ApiSuccess::new()),
        Err(error) => domain_error_response(error),
    }
}
