//! Application factory
//!
//! Builds the Actix-web application around a shared [`AppState`] so the
//! same wiring serves both the binary and the integration tests (which
//! inject in-memory repositories and a mock email service).

use actix_web::{middleware::Logger, web, App, HttpResponse};

use crate::middleware::cors::create_cors;
use crate::routes::auth::{
    password_reset::password_reset, register::register, register::send_code, sign_in::sign_in,
    AppState,
};

use fa_core::repositories::{OtpRepository, UserRepository};
use fa_core::services::otp::EmailServiceTrait;

/// Create and configure the application with all dependencies
pub fn create_app<U, O, E>(
    app_state: web::Data<AppState<U, O, E>>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    U: UserRepository + 'static,
    O: OtpRepository + 'static,
    E: EmailServiceTrait + 'static,
{
    let cors = create_cors();

    App::new()
        .app_data(app_state)
        .wrap(Logger::default())
        .wrap(cors)
        // Health check endpoint
        .route("/health", web::get().to(health_check))
        // API v1 routes
        .service(
            web::scope("/api/v1").service(
                web::scope("/auth")
                    .route("/register/send-code", web::post().to(send_code::<U, O, E>))
                    .route("/register", web::post().to(register::<U, O, E>))
                    .route("/password", web::post().to(password_reset::<U, O, E>))
                    .route("/sign-in", web::post().to(sign_in::<U, O, E>)),
            ),
        )
        // Default 404 handler
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "formai-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": "The requested resource was not found"
    }))
}
