//! MySQL implementation of the OtpRepository trait.
//!
//! The supersede-then-insert and the guarded status transitions run inside
//! database transactions; they are the serialization points that keep the
//! single-pending invariant under concurrent requests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use std::str::FromStr;
use tracing::{debug, info};
use uuid::Uuid;

use fa_core::domain::entities::otp::{OtpPurpose, OtpRecord, OtpStatus};
use fa_core::errors::DomainError;
use fa_core::repositories::OtpRepository;
use fa_shared::utils::email::mask_email;

/// MySQL implementation of OtpRepository
pub struct MySqlOtpRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlOtpRepository {
    /// Create a new MySQL OTP repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert a database row to an OtpRecord entity
    fn row_to_record(row: &sqlx::mysql::MySqlRow) -> Result<OtpRecord, DomainError> {
        let id: String = row.try_get("id").map_err(db_err("id"))?;
        let purpose: String = row.try_get("purpose").map_err(db_err("purpose"))?;
        let status: String = row.try_get("status").map_err(db_err("status"))?;

        Ok(OtpRecord {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Database {
                message: format!("Invalid UUID in otps.id: {}", e),
            })?,
            email: row.try_get("email").map_err(db_err("email"))?,
            code: row.try_get("code").map_err(db_err("code"))?,
            purpose: OtpPurpose::from_str(&purpose)
                .map_err(|e| DomainError::Database { message: e })?,
            status: OtpStatus::from_str(&status)
                .map_err(|e| DomainError::Database { message: e })?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(db_err("created_at"))?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(db_err("expires_at"))?,
        })
    }

    async fn find_one(
        &self,
        email: &str,
        code: &str,
        purpose: OtpPurpose,
        statuses: &[OtpStatus],
        now: DateTime<Utc>,
    ) -> Result<Option<OtpRecord>, DomainError> {
        // Status list is fixed by the caller, never user input
        let status_list = statuses
            .iter()
            .map(|s| format!("'{}'", s.as_str()))
            .collect::<Vec<_>>()
            .join(", ");
        let query = format!(
            r#"
            SELECT id, email, code, purpose, status, created_at, expires_at
            FROM otps
            WHERE email = ? AND code = ? AND purpose = ?
              AND status IN ({}) AND expires_at > ?
            ORDER BY created_at DESC
            LIMIT 1
            "#,
            status_list
        );

        let result = sqlx::query(&query)
            .bind(email)
            .bind(code)
            .bind(purpose.as_str())
            .bind(now)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Database {
                message: format!("OTP lookup failed: {}", e),
            })?;

        match result {
            Some(row) => Ok(Some(Self::row_to_record(&row)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl OtpRepository for MySqlOtpRepository {
    async fn supersede_and_insert(&self, record: OtpRecord) -> Result<OtpRecord, DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| DomainError::Database {
            message: format!("Failed to begin transaction: {}", e),
        })?;

        // Expire every live record for the pair before inserting the new one
        let superseded = sqlx::query(
            r#"
            UPDATE otps
            SET status = 'expired'
            WHERE email = ? AND purpose = ? AND status IN ('pending', 'verified')
            "#,
        )
        .bind(&record.email)
        .bind(record.purpose.as_str())
        .execute(&mut *tx)
        .await
        .map_err(|e| DomainError::Database {
            message: format!("Failed to supersede OTP records: {}", e),
        })?
        .rows_affected();

        sqlx::query(
            r#"
            INSERT INTO otps (id, email, code, purpose, status, created_at, expires_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.id.to_string())
        .bind(&record.email)
        .bind(&record.code)
        .bind(record.purpose.as_str())
        .bind(record.status.as_str())
        .bind(record.created_at)
        .bind(record.expires_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| DomainError::Database {
            message: format!("Failed to insert OTP record: {}", e),
        })?;

        tx.commit().await.map_err(|e| DomainError::Database {
            message: format!("Failed to commit OTP insert: {}", e),
        })?;

        debug!(
            email = %mask_email(&record.email),
            purpose = %record.purpose,
            superseded,
            "Inserted OTP record"
        );
        Ok(record)
    }

    async fn find_pending(
        &self,
        email: &str,
        code: &str,
        purpose: OtpPurpose,
        now: DateTime<Utc>,
    ) -> Result<Option<OtpRecord>, DomainError> {
        self.find_one(email, code, purpose, &[OtpStatus::Pending], now)
            .await
    }

    async fn find_consumable(
        &self,
        email: &str,
        code: &str,
        purpose: OtpPurpose,
        now: DateTime<Utc>,
    ) -> Result<Option<OtpRecord>, DomainError> {
        self.find_one(
            email,
            code,
            purpose,
            &[OtpStatus::Pending, OtpStatus::Verified],
            now,
        )
        .await
    }

    async fn mark_verified(&self, id: Uuid) -> Result<bool, DomainError> {
        // Guarded transition: a concurrent winner or a superseding code
        // makes this a no-op, reported to the caller as `false`
        let rows = sqlx::query(
            r#"
            UPDATE otps
            SET status = 'verified'
            WHERE id = ? AND status = 'pending' AND expires_at > ?
            "#,
        )
        .bind(id.to_string())
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::Database {
            message: format!("Failed to mark OTP verified: {}", e),
        })?
        .rows_affected();

        Ok(rows == 1)
    }

    async fn mark_expired(&self, id: Uuid) -> Result<(), DomainError> {
        // Terminal rows stay put; only pending/verified can expire
        sqlx::query(
            r#"
            UPDATE otps
            SET status = 'expired'
            WHERE id = ? AND status IN ('pending', 'verified')
            "#,
        )
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::Database {
            message: format!("Failed to mark OTP expired: {}", e),
        })?;
        Ok(())
    }

    async fn find_latest(
        &self,
        email: &str,
        purpose: OtpPurpose,
    ) -> Result<Option<OtpRecord>, DomainError> {
        let result = sqlx::query(
            r#"
            SELECT id, email, code, purpose, status, created_at, expires_at
            FROM otps
            WHERE email = ? AND purpose = ?
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(email)
        .bind(purpose.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::Database {
            message: format!("OTP lookup failed: {}", e),
        })?;

        match result {
            Some(row) => Ok(Some(Self::row_to_record(&row)?)),
            None => Ok(None),
        }
    }

    async fn delete_expired_before(&self, cutoff: DateTime<Utc>) -> Result<u64, DomainError> {
        let deleted = sqlx::query("DELETE FROM otps WHERE expires_at < ?")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Database {
                message: format!("Failed to sweep expired OTP records: {}", e),
            })?
            .rows_affected();

        if deleted > 0 {
            info!(deleted, "Swept expired OTP records");
        }
        Ok(deleted)
    }
}

fn db_err(column: &'static str) -> impl Fn(sqlx::Error) -> DomainError {
    move |e| DomainError::Database {
        message: format!("Failed to get {}: {}", column, e),
    }
}
