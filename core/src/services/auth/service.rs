//! Auth orchestration service
//!
//! Drives the three-step request-code / verify-code / commit protocol for
//! registration and password reset. The protocol is stateless between steps:
//! the client resubmits email and code as needed, and every commit re-checks
//! the OTP server-side before touching credentials.

use std::sync::Arc;
use tracing::{info, warn};

use fa_shared::utils::email::{is_valid_email, mask_email, normalize_email};

use crate::domain::entities::otp::OtpPurpose;
use crate::domain::entities::user::User;
use crate::errors::{DomainError, DomainResult};
use crate::repositories::{OtpRepository, UserRepository};
use crate::services::otp::{EmailServiceTrait, ExistenceCheck, OtpService};

use super::config::AuthServiceConfig;
use super::password::{hash_password, validate_password_complexity, verify_password};

/// Orchestrates registration, password reset, and sign-in
pub struct AuthService<U: UserRepository, O: OtpRepository, E: EmailServiceTrait> {
    /// Credential store
    user_repository: Arc<U>,
    /// OTP lifecycle manager
    otp_service: OtpService<O, U, E>,
    /// Service configuration
    config: AuthServiceConfig,
}

impl<U: UserRepository, O: OtpRepository, E: EmailServiceTrait> AuthService<U, O, E> {
    /// Create a new auth service
    pub fn new(
        user_repository: Arc<U>,
        otp_service: OtpService<O, U, E>,
        config: AuthServiceConfig,
    ) -> Self {
        Self {
            user_repository,
            otp_service,
            config,
        }
    }

    /// Registration step 1: validate input and send a registration code.
    ///
    /// The password is validated here as well so the user learns about a
    /// policy violation before checking their inbox.
    pub async fn request_registration(&self, email: &str, password: &str) -> DomainResult<()> {
        let email = validate_email(email)?;
        validate_password(password)?;

        self.otp_service
            .issue(&email, OtpPurpose::Registration, ExistenceCheck::Prevent)
            .await?;
        Ok(())
    }

    /// Registration commit: verify the code, then atomically create the
    /// user and consume the OTP record.
    ///
    /// On a store failure after verification the OTP record stays
    /// `verified` and no user row exists, so the whole flow can be retried.
    pub async fn complete_registration(
        &self,
        email: &str,
        password: &str,
        code: &str,
    ) -> DomainResult<()> {
        let email = validate_email(email)?;
        validate_password(password)?;

        // Re-check existence: the account may have been created since the
        // code was requested
        if let Some(existing) = self.user_repository.find_by_email(&email).await? {
            let oauth_provider = self
                .user_repository
                .find_oauth_provider(existing.id)
                .await?;
            return Err(DomainError::AlreadyExists { oauth_provider });
        }

        let verification = self
            .otp_service
            .verify(&email, code, OtpPurpose::Registration)
            .await?;
        if !verification.verified {
            return Err(DomainError::InvalidOrExpiredOtp);
        }

        let password_hash = hash_password(password, self.config.bcrypt_cost)?;
        let user = User::new_registered(email.clone(), password_hash);

        let created = self
            .user_repository
            .create_user_consuming_otp(user, verification.otp_id)
            .await?;

        info!(
            email = %mask_email(&email),
            user_id = %created.id,
            event = "user_registered",
            "Registration completed"
        );
        Ok(())
    }

    /// Whether an account exists for the (normalized) email address.
    ///
    /// Gate for the password route: the whole reset endpoint 404s for
    /// unknown addresses before any step runs.
    pub async fn user_exists(&self, email: &str) -> DomainResult<bool> {
        let email = normalize_email(email);
        self.user_repository.exists_by_email(&email).await
    }

    /// Password-reset step 1: confirm the account exists and send a code
    pub async fn reset_step1(&self, email: &str) -> DomainResult<()> {
        let email = validate_email(email)?;

        self.otp_service
            .issue(&email, OtpPurpose::PasswordReset, ExistenceCheck::Require)
            .await?;
        Ok(())
    }

    /// Password-reset step 2: non-destructive code pre-check.
    ///
    /// Lets the client advance to the password form without consuming the
    /// code; step 3 re-checks it regardless.
    pub async fn reset_step2(&self, email: &str, code: &str) -> DomainResult<()> {
        let email = validate_email(email)?;

        let record = self
            .otp_service
            .check_valid(&email, code, OtpPurpose::PasswordReset)
            .await?;
        match record {
            Some(_) => Ok(()),
            None => Err(DomainError::InvalidOrExpiredOtp),
        }
    }

    /// Password-reset commit: re-check the code, then atomically update the
    /// password and consume the OTP record.
    pub async fn reset_step3(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> DomainResult<()> {
        let email = validate_email(email)?;
        validate_password(new_password)?;

        // Stale-code defense: the code may have expired since step 2
        let record = self
            .otp_service
            .check_valid(&email, code, OtpPurpose::PasswordReset)
            .await?
            .ok_or(DomainError::InvalidOrExpiredOtp)?;

        let password_hash = hash_password(new_password, self.config.bcrypt_cost)?;
        self.user_repository
            .update_password_consuming_otp(&email, &password_hash, record.id)
            .await?;

        info!(
            email = %mask_email(&email),
            event = "password_reset",
            "Password reset completed"
        );
        Ok(())
    }

    /// Thin credential authenticator.
    ///
    /// Every failure path (unknown email, OAuth-only account, inactive
    /// account, wrong password) returns the same `InvalidCredentials`
    /// error so nothing about the account leaks.
    pub async fn sign_in(&self, email: &str, password: &str) -> DomainResult<User> {
        let email = normalize_email(email);

        let user = match self.user_repository.find_by_email(&email).await? {
            Some(user) => user,
            None => {
                warn!(
                    email = %mask_email(&email),
                    event = "sign_in_failed",
                    "Sign-in attempt for unknown email"
                );
                return Err(DomainError::InvalidCredentials);
            }
        };

        if !user.is_active {
            return Err(DomainError::InvalidCredentials);
        }

        let hash = match user.password_hash.as_deref() {
            Some(hash) => hash,
            None => return Err(DomainError::InvalidCredentials),
        };

        if !verify_password(password, hash) {
            warn!(
                email = %mask_email(&email),
                event = "sign_in_failed",
                "Sign-in attempt with wrong password"
            );
            return Err(DomainError::InvalidCredentials);
        }

        info!(
            email = %mask_email(&email),
            user_id = %user.id,
            event = "sign_in_succeeded",
            "Sign-in succeeded"
        );
        Ok(user)
    }
}

fn validate_email(email: &str) -> DomainResult<String> {
    let normalized = normalize_email(email);
    if !is_valid_email(&normalized) {
        return Err(DomainError::validation("Please enter a valid email address"));
    }
    Ok(normalized)
}

fn validate_password(password: &str) -> DomainResult<()> {
    validate_password_complexity(password)
        .map_err(|messages| DomainError::Validation { messages })
}
