use std::io::{Error, ErrorKind};
use std::sync::Arc;

use actix_web::{web, HttpServer};
use dotenvy::dotenv;
use log::{info, warn};

use fa_api::app::create_app;
use fa_api::routes::auth::AppState;
use fa_core::services::auth::{AuthService, AuthServiceConfig};
use fa_core::services::otp::{EmailServiceTrait, OtpService, OtpServiceConfig};
use fa_infra::database::{DatabasePool, MySqlOtpRepository, MySqlUserRepository};
use fa_infra::email::{HttpEmailService, MockEmailService};
use fa_shared::config::AppConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting FormAI API Server");

    let config = AppConfig::from_env();
    info!("Environment: {}", config.environment);

    if config.auth.auto_verify_otp {
        warn!("OTP auto-verify is enabled; every code will be accepted");
    }

    // Database pool and schema
    let pool = DatabasePool::new(&config.database)
        .await
        .map_err(|e| Error::new(ErrorKind::Other, e.to_string()))?;
    pool.run_migrations()
        .await
        .map_err(|e| Error::new(ErrorKind::Other, e.to_string()))?;

    let user_repo = Arc::new(MySqlUserRepository::new(pool.get_pool().clone()));
    let otp_repo = Arc::new(MySqlOtpRepository::new(pool.get_pool().clone()));

    // The email service is a generic type parameter of the whole app, so
    // the mock and the HTTP provider each get their own monomorphized run
    if config.email.use_mock {
        warn!("Using mock email service; OTP codes are logged, not sent");
        let email_service = Arc::new(MockEmailService::new());
        run_server(config, user_repo, otp_repo, email_service).await
    } else {
        let email_service = Arc::new(
            HttpEmailService::new(config.email.clone(), config.auth.otp_expiration_minutes)
                .map_err(|e| Error::new(ErrorKind::Other, e.to_string()))?,
        );
        run_server(config, user_repo, otp_repo, email_service).await
    }
}

async fn run_server<E>(
    config: AppConfig,
    user_repo: Arc<MySqlUserRepository>,
    otp_repo: Arc<MySqlOtpRepository>,
    email_service: Arc<E>,
) -> std::io::Result<()>
where
    E: EmailServiceTrait + 'static,
{
    let otp_service = OtpService::new(
        otp_repo,
        user_repo.clone(),
        email_service,
        OtpServiceConfig::from(&config.auth),
    );
    let auth_service = Arc::new(AuthService::new(
        user_repo,
        otp_service,
        AuthServiceConfig::from(&config.auth),
    ));
    let app_state = web::Data::new(AppState { auth_service });

    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    HttpServer::new(move || create_app(app_state.clone()))
        .bind(&bind_address)?
        .run()
        .await
}
