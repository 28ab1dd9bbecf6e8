//! OTP repository trait defining the interface for OTP record persistence.
//!
//! The single-pending invariant (at most one pending-or-verified record per
//! email/purpose pair) and the serialization of concurrent verifications both
//! live behind this trait: `supersede_and_insert` and `mark_verified` must be
//! atomic in any real implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::otp::{OtpPurpose, OtpRecord};
use crate::errors::DomainError;

/// Repository trait for OTP record persistence operations
#[async_trait]
pub trait OtpRepository: Send + Sync {
    /// Atomically expire every pending/verified record for the record's
    /// (email, purpose) pair, then insert the new pending record.
    ///
    /// Both steps happen in one transaction so concurrent issuance can never
    /// leave two live records for the same pair.
    async fn supersede_and_insert(&self, record: OtpRecord) -> Result<OtpRecord, DomainError>;

    /// Find a record matching (email, code, purpose) with status `pending`
    /// and `expires_at > now`.
    async fn find_pending(
        &self,
        email: &str,
        code: &str,
        purpose: OtpPurpose,
        now: DateTime<Utc>,
    ) -> Result<Option<OtpRecord>, DomainError>;

    /// Find a record matching (email, code, purpose) with status `pending`
    /// or `verified` and `expires_at > now`.
    ///
    /// Non-destructive lookup used by the reset flow's step-2 pre-check and
    /// step-3 re-check.
    async fn find_consumable(
        &self,
        email: &str,
        code: &str,
        purpose: OtpPurpose,
        now: DateTime<Utc>,
    ) -> Result<Option<OtpRecord>, DomainError>;

    /// Conditionally transition a record `pending -> verified`.
    ///
    /// Returns `Ok(false)` when the record is no longer pending (a concurrent
    /// request won the race, or the record was superseded); the caller must
    /// treat that as a normal negative verification result.
    async fn mark_verified(&self, id: Uuid) -> Result<bool, DomainError>;

    /// Transition a record to `expired`.
    ///
    /// Compensation path: called when the notifier send fails so the freshly
    /// inserted record does not outlive the failed delivery.
    async fn mark_expired(&self, id: Uuid) -> Result<(), DomainError>;

    /// Find the newest record for (email, purpose) regardless of status.
    ///
    /// Only used by the auto-verify path.
    async fn find_latest(
        &self,
        email: &str,
        purpose: OtpPurpose,
    ) -> Result<Option<OtpRecord>, DomainError>;

    /// Delete records whose expiry lies before `cutoff` (maintenance sweep).
    ///
    /// Returns the number of deleted rows.
    async fn delete_expired_before(&self, cutoff: DateTime<Utc>) -> Result<u64, DomainError>;
}
