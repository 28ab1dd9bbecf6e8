//! Mapping of domain errors to HTTP responses.
//!
//! The body is always `{"error": "<message>"}`. Store and delivery errors
//! are logged with full detail but surface generically; the anti-oracle
//! messages of the domain layer pass through unchanged.

use actix_web::HttpResponse;
use validator::ValidationErrors;

use fa_core::errors::DomainError;
use fa_shared::types::response::ApiError;

/// Convert a domain error into its HTTP response
pub fn domain_error_response(error: DomainError) -> HttpResponse {
    match &error {
        DomainError::Validation { .. } => {
            HttpResponse::BadRequest().json(ApiError::new(error.to_string()))
        }
        DomainError::UserNotFound => {
            HttpResponse::NotFound().json(ApiError::new(error.to_string()))
        }
        DomainError::AlreadyExists { .. } => {
            HttpResponse::Conflict().json(ApiError::new(error.to_string()))
        }
        DomainError::InvalidOrExpiredOtp => {
            HttpResponse::BadRequest().json(ApiError::new(error.to_string()))
        }
        DomainError::InvalidCredentials => {
            HttpResponse::Unauthorized().json(ApiError::new(error.to_string()))
        }
        DomainError::EmailDelivery { message } => {
            log::error!("Email delivery failed: {}", message);
            HttpResponse::InternalServerError().json(ApiError::new("Failed to send OTP"))
        }
        DomainError::Database { message } => {
            log::error!("Database error: {}", message);
            HttpResponse::InternalServerError().json(ApiError::new("Failed to process request"))
        }
    }
}

/// Convert DTO validation failures into a 400 with all messages joined
pub fn validation_error_response(errors: &ValidationErrors) -> HttpResponse {
    let messages: Vec<String> = errors
        .field_errors()
        .values()
        .flat_map(|field_errors| {
            field_errors.iter().map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
        })
        .collect();

    HttpResponse::BadRequest().json(ApiError::new(messages.join(", ")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (DomainError::UserNotFound, StatusCode::NOT_FOUND),
            (
                DomainError::AlreadyExists {
                    oauth_provider: None,
                },
                StatusCode::CONFLICT,
            ),
            (DomainError::InvalidOrExpiredOtp, StatusCode::BAD_REQUEST),
            (DomainError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (
                DomainError::Database {
                    message: "conn refused".to_string(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, status) in cases {
            assert_eq!(domain_error_response(error).status(), status);
        }
    }
}
