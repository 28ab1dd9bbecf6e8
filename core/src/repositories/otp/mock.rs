//! Mock implementation of OtpRepository for testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::otp::{OtpPurpose, OtpRecord, OtpStatus};
use crate::errors::DomainError;

use super::repository::OtpRepository;

/// OTP records shared between the mock repositories, so the composite
/// user-repository commits observe the same state the OTP repository mutates.
pub type SharedOtpStore = Arc<RwLock<HashMap<Uuid, OtpRecord>>>;

/// Mock OTP repository for testing
pub struct MockOtpRepository {
    records: SharedOtpStore,
    fail_next: AtomicBool,
}

impl MockOtpRepository {
    /// Create a new mock repository with its own store
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
            fail_next: AtomicBool::new(false),
        }
    }

    /// Create a mock repository over a shared store
    pub fn with_store(records: SharedOtpStore) -> Self {
        Self {
            records,
            fail_next: AtomicBool::new(false),
        }
    }

    /// Handle to the underlying store
    pub fn store(&self) -> SharedOtpStore {
        Arc::clone(&self.records)
    }

    /// Make the next repository call fail with a database error
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    fn take_failure(&self) -> Result<(), DomainError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(DomainError::Database {
                message: "simulated store failure".to_string(),
            });
        }
        Ok(())
    }

    /// Snapshot of all records for an email/purpose pair, for assertions
    pub async fn records_for(&self, email: &str, purpose: OtpPurpose) -> Vec<OtpRecord> {
        let records = self.records.read().await;
        records
            .values()
            .filter(|r| r.email == email && r.purpose == purpose)
            .cloned()
            .collect()
    }
}

impl Default for MockOtpRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OtpRepository for MockOtpRepository {
    async fn supersede_and_insert(&self, record: OtpRecord) -> Result<OtpRecord, DomainError> {
        self.take_failure()?;
        let mut records = self.records.write().await;
        for existing in records.values_mut() {
            if existing.email == record.email
                && existing.purpose == record.purpose
                && matches!(existing.status, OtpStatus::Pending | OtpStatus::Verified)
            {
                existing.status = OtpStatus::Expired;
            }
        }
        records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_pending(
        &self,
        email: &str,
        code: &str,
        purpose: OtpPurpose,
        now: DateTime<Utc>,
    ) -> Result<Option<OtpRecord>, DomainError> {
        self.take_failure()?;
        let records = self.records.read().await;
        Ok(records
            .values()
            .find(|r| {
                r.email == email
                    && r.code == code
                    && r.purpose == purpose
                    && r.status == OtpStatus::Pending
                    && r.expires_at > now
            })
            .cloned())
    }

    async fn find_consumable(
        &self,
        email: &str,
        code: &str,
        purpose: OtpPurpose,
        now: DateTime<Utc>,
    ) -> Result<Option<OtpRecord>, DomainError> {
        self.take_failure()?;
        let records = self.records.read().await;
        Ok(records
            .values()
            .find(|r| {
                r.email == email
                    && r.code == code
                    && r.purpose == purpose
                    && matches!(r.status, OtpStatus::Pending | OtpStatus::Verified)
                    && r.expires_at > now
            })
            .cloned())
    }

    async fn mark_verified(&self, id: Uuid) -> Result<bool, DomainError> {
        self.take_failure()?;
        let mut records = self.records.write().await;
        match records.get_mut(&id) {
            Some(record) if record.status == OtpStatus::Pending && !record.is_expired() => {
                record.status = OtpStatus::Verified;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn mark_expired(&self, id: Uuid) -> Result<(), DomainError> {
        self.take_failure()?;
        let mut records = self.records.write().await;
        if let Some(record) = records.get_mut(&id) {
            if !record.status.is_terminal() {
                record.status = OtpStatus::Expired;
            }
        }
        Ok(())
    }

    async fn find_latest(
        &self,
        email: &str,
        purpose: OtpPurpose,
    ) -> Result<Option<OtpRecord>, DomainError> {
        self.take_failure()?;
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|r| r.email == email && r.purpose == purpose)
            .max_by_key(|r| r.created_at)
            .cloned())
    }

    async fn delete_expired_before(&self, cutoff: DateTime<Utc>) -> Result<u64, DomainError> {
        self.take_failure()?;
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, r| r.expires_at >= cutoff);
        Ok((before - records.len()) as u64)
    }
}
