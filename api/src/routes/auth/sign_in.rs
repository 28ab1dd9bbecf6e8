use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::dto::auth::SignInRequest;
use crate::handlers::{domain_error_response, validation_error_response};
use crate::routes::auth::AppState;

use fa_core::repositories::{OtpRepository, UserRepository};
use fa_core::services::otp::EmailServiceTrait;
use fa_shared::types::response::ApiSuccess;
use fa_shared::utils::email::mask_email;

/// Handler for POST /api/v1/auth/sign-in
///
/// Every authentication failure returns the same 401 message; the response
/// never reveals whether the address is registered.
pub async fn sign_in<U, O, E>(
    state: web::Data<AppState<U, O, E>>,
    request: web::Json<SignInRequest>,
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
        "Processing sign-in for email: {}",
        mask_email(&request.email)
    );

    match state
        .auth_service
        .sign_in(&request.email, &request.password)
        .await
    {
        Ok(_user) => HttpResponse::Ok().json(ApiSuccess::new()),
        Err(error) => domain_error_response(error),
    }
}
