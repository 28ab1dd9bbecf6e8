//! Main OTP lifecycle service implementation

use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, warn};

use fa_shared::utils::email::mask_email;

use crate::domain::entities::otp::{OtpPurpose, OtpRecord};
use crate::errors::{DomainError, DomainResult};
use crate::repositories::{OtpRepository, UserRepository};

use super::config::OtpServiceConfig;
use super::traits::EmailServiceTrait;
use super::types::{is_valid_code_shape, ExistenceCheck, IssueOtpResult, VerifyOtpResult};

/// OTP lifecycle service
///
/// Generates, stores, invalidates, and verifies one-time passcodes, and
/// enforces the existence-check policy at issuance.
pub struct OtpService<O: OtpRepository, U: UserRepository, E: EmailServiceTrait> {
    /// OTP record persistence
    otp_repository: Arc<O>,
    /// User lookups for the existence-check policy
    user_repository: Arc<U>,
    /// Out-of-band notifier
    email_service: Arc<E>,
    /// Service configuration
    config: OtpServiceConfig,
}

impl<O: OtpRepository, U: UserRepository, E: EmailServiceTrait> OtpService<O, U, E> {
    /// Create a new OTP service
    pub fn new(
        otp_repository: Arc<O>,
        user_repository: Arc<U>,
        email_service: Arc<E>,
        config: OtpServiceConfig,
    ) -> Self {
        Self {
            otp_repository,
            user_repository,
            email_service,
            config,
        }
    }

    /// Issue a new code for (email, purpose) under the given existence policy.
    ///
    /// Within one store transaction, all live records for the pair are
    /// expired and a fresh pending record inserted, so at most one
    /// pending-or-verified record exists per pair at any time. The notifier
    /// is then invoked outside that transaction; if the send fails, the
    /// fresh record is expired again (best-effort) and the whole issuance
    /// fails, so a pending record never outlives a failed send.
    ///
    /// The returned result never contains the code.
    pub async fn issue(
        &self,
        email: &str,
        purpose: OtpPurpose,
        existence_check: ExistenceCheck,
    ) -> DomainResult<IssueOtpResult> {
        self.apply_existence_check(email, existence_check).await?;

        let record = OtpRecord::new_with_expiration(
            email.to_string(),
            purpose,
            self.config.expiration_minutes,
        );
        let otp_id = record.id;
        let expires_at = record.expires_at;
        let code = record.code.clone();

        self.otp_repository.supersede_and_insert(record).await?;

        info!(
            email = %mask_email(email),
            purpose = %purpose,
            otp_id = %otp_id,
            event = "otp_issued",
            "Issued new OTP"
        );

        let message_id = match self.email_service.send_otp_email(email, &code, purpose).await {
            Ok(message_id) => message_id,
            Err(send_error) => {
                error!(
                    email = %mask_email(email),
                    purpose = %purpose,
                    otp_id = %otp_id,
                    error = %send_error,
                    event = "otp_send_failed",
                    "Failed to send OTP email, expiring record"
                );
                // Compensation: the record must not stay live after a
                // failed delivery
                if let Err(expire_error) = self.otp_repository.mark_expired(otp_id).await {
                    error!(
                        otp_id = %otp_id,
                        error = %expire_error,
                        "Failed to expire OTP after send failure"
                    );
                }
                return Err(DomainError::EmailDelivery {
                    message: send_error,
                });
            }
        };

        Ok(IssueOtpResult {
            otp_id,
            expires_at,
            message_id,
        })
    }

    /// Verify a submitted code, transitioning the matching record to
    /// `verified` on success.
    ///
    /// A miss (wrong code, expired, already consumed, or no such request)
    /// yields the same generic negative result.
    pub async fn verify(
        &self,
        email: &str,
        code: &str,
        purpose: OtpPurpose,
    ) -> DomainResult<VerifyOtpResult> {
        if !is_valid_code_shape(code) {
            warn!(
                email = %mask_email(email),
                purpose = %purpose,
                event = "otp_bad_shape",
                "Rejected OTP with invalid shape"
            );
            return Ok(VerifyOtpResult::rejected());
        }

        if self.config.auto_verify {
            warn!(
                email = %mask_email(email),
                purpose = %purpose,
                event = "otp_auto_verified",
                "AUTO-VERIFY ENABLED: accepting OTP without checking the store"
            );
            let latest = self.otp_repository.find_latest(email, purpose).await?;
            return Ok(VerifyOtpResult::accepted(latest.map(|r| r.id)));
        }

        let record = match self
            .otp_repository
            .find_pending(email, code, purpose, Utc::now())
            .await?
        {
            Some(record) => record,
            None => {
                warn!(
                    email = %mask_email(email),
                    purpose = %purpose,
                    event = "otp_verification_failed",
                    "OTP verification failed"
                );
                return Ok(VerifyOtpResult::rejected());
            }
        };

        // Conditional transition; a lost race reads as a normal miss
        if !self.otp_repository.mark_verified(record.id).await? {
            warn!(
                email = %mask_email(email),
                otp_id = %record.id,
                event = "otp_verification_race_lost",
                "OTP no longer pending at verification time"
            );
            return Ok(VerifyOtpResult::rejected());
        }

        info!(
            email = %mask_email(email),
            purpose = %purpose,
            otp_id = %record.id,
            event = "otp_verified",
            "OTP successfully verified"
        );

        Ok(VerifyOtpResult::accepted(Some(record.id)))
    }

    /// Non-destructive validity check: is there a pending-or-verified,
    /// unexpired record for (email, code, purpose)?
    ///
    /// Used by the reset flow's step-2 pre-check and step-3 re-check; never
    /// mutates the record.
    pub async fn check_valid(
        &self,
        email: &str,
        code: &str,
        purpose: OtpPurpose,
    ) -> DomainResult<Option<OtpRecord>> {
        if !is_valid_code_shape(code) {
            return Ok(None);
        }
        self.otp_repository
            .find_consumable(email, code, purpose, Utc::now())
            .await
    }

    /// Delete records that expired before now (maintenance sweep)
    pub async fn sweep_expired(&self) -> DomainResult<u64> {
        let deleted = self.otp_repository.delete_expired_before(Utc::now()).await?;
        if deleted > 0 {
            info!(deleted = deleted, event = "otp_sweep", "Swept expired OTP records");
        }
        Ok(deleted)
    }

    async fn apply_existence_check(
        &self,
        email: &str,
        existence_check: ExistenceCheck,
    ) -> DomainResult<()> {
        match existence_check {
            ExistenceCheck::Prevent => {
                if let Some(user) = self.user_repository.find_by_email(email).await? {
                    let oauth_provider =
                        self.user_repository.find_oauth_provider(user.id).await?;
                    info!(
                        email = %mask_email(email),
                        oauth_linked = oauth_provider.is_some(),
                        event = "otp_issue_prevented",
                        "Refusing to issue OTP: user already exists"
                    );
                    return Err(DomainError::AlreadyExists { oauth_provider });
                }
                Ok(())
            }
            ExistenceCheck::Require => {
                if !self.user_repository.exists_by_email(email).await? {
                    info!(
                        email = %mask_email(email),
                        event = "otp_issue_refused",
                        "Refusing to issue OTP: no such user"
                    );
                    return Err(DomainError::UserNotFound);
                }
                Ok(())
            }
            ExistenceCheck::None => Ok(()),
        }
    }
}
