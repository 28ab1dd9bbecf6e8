//! User repository trait defining the interface for credential persistence.
//!
//! Besides plain lookups, this trait carries the two composite commit
//! operations of the registration and password-reset protocols. Each commit
//! couples a credential mutation with the consumption of the authorizing OTP
//! record in one transaction: a failure partway through must never leave a
//! consumed OTP without the credential change, or vice versa.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

/// Repository trait for User entity persistence operations
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by normalized email address
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Check whether a user exists for the given normalized email
    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError>;

    /// First OAuth provider linked to the user, lower-cased, if any
    async fn find_oauth_provider(&self, user_id: Uuid) -> Result<Option<String>, DomainError>;

    /// Registration commit: insert the user and consume the verified OTP
    /// record, all in one transaction.
    ///
    /// The OTP transition is guarded (`verified -> used`); if the record is
    /// no longer verified the whole commit fails with
    /// [`DomainError::InvalidOrExpiredOtp`] and nothing is written.
    /// `otp_id` is `None` only on the auto-verify path, where there may be
    /// no record to consume.
    async fn create_user_consuming_otp(
        &self,
        user: User,
        otp_id: Option<Uuid>,
    ) -> Result<User, DomainError>;

    /// Password-reset commit: flip the OTP record to `used` (guarded by
    /// status and expiry), update the stored password hash, and delete the
    /// OTP row, all in one transaction.
    ///
    /// The guarded OTP update is the serialization point for concurrent
    /// commits: the losing request observes
    /// [`DomainError::InvalidOrExpiredOtp`] and no password change.
    async fn update_password_consuming_otp(
        &self,
        email: &str,
        password_hash: &str,
        otp_id: Uuid,
    ) -> Result<(), DomainError>;
}
