//! MySQL implementation of the UserRepository trait.
//!
//! Carries the two composite commit operations of the auth flows. Each one
//! couples its credential write with a guarded OTP status transition in a
//! single transaction, so a failure partway through rolls back both sides.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use tracing::{info, warn};
use uuid::Uuid;

use fa_core::domain::entities::user::User;
use fa_core::errors::DomainError;
use fa_core::repositories::UserRepository;
use fa_shared::utils::email::mask_email;

/// MySQL implementation of UserRepository
pub struct MySqlUserRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlUserRepository {
    /// Create a new MySQL user repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert a database row to a User entity
    fn row_to_user(row: &sqlx::mysql::MySqlRow) -> Result<User, DomainError> {
        let id: String = row.try_get("id").map_err(db_err("id"))?;

        Ok(User {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Database {
                message: format!("Invalid UUID in users.id: {}", e),
            })?,
            email: row.try_get("email").map_err(db_err("email"))?,
            password_hash: row
                .try_get("password_hash")
                .map_err(db_err("password_hash"))?,
            email_verified_at: row
                .try_get::<Option<DateTime<Utc>>, _>("email_verified_at")
                .map_err(db_err("email_verified_at"))?,
            is_active: row.try_get("is_active").map_err(db_err("is_active"))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(db_err("created_at"))?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(db_err("updated_at"))?,
        })
    }

    fn is_duplicate_key(e: &sqlx::Error) -> bool {
        matches!(e.as_database_error(), Some(db) if db.is_unique_violation())
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let result = sqlx::query(
            r#"
            SELECT id, email, password_hash, email_verified_at,
                   is_active, created_at, updated_at
            FROM users
            WHERE email = ?
            LIMIT 1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::Database {
            message: format!("User lookup failed: {}", e),
        })?;

        match result {
            Some(row) => Ok(Some(Self::row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM users WHERE email = ?) AS present")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::Database {
                message: format!("User existence check failed: {}", e),
            })?;

        let present: i64 = row.try_get("present").map_err(db_err("present"))?;
        Ok(present != 0)
    }

    async fn find_oauth_provider(&self, user_id: Uuid) -> Result<Option<String>, DomainError> {
        let result = sqlx::query(
            r#"
            SELECT provider
            FROM oauth_accounts
            WHERE user_id = ?
            ORDER BY created_at ASC
            LIMIT 1
            "#,
        )
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::Database {
            message: format!("OAuth account lookup failed: {}", e),
        })?;

        match result {
            Some(row) => Ok(Some(row.try_get("provider").map_err(db_err("provider"))?)),
            None => Ok(None),
        }
    }

    async fn create_user_consuming_otp(
        &self,
        user: User,
        otp_id: Option<Uuid>,
    ) -> Result<User, DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| DomainError::Database {
            message: format!("Failed to begin transaction: {}", e),
        })?;

        // Consume the authorizing record first; the guard loses gracefully
        // to a concurrent commit using the same code
        if let Some(otp_id) = otp_id {
            let rows = sqlx::query(
                "UPDATE otps SET status = 'used' WHERE id = ? AND status = 'verified'",
            )
            .bind(otp_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::Database {
                message: format!("Failed to consume OTP record: {}", e),
            })?
            .rows_affected();

            if rows == 0 {
                warn!(
                    email = %mask_email(&user.email),
                    event = "otp_consume_conflict",
                    "Registration commit lost the OTP consumption race"
                );
                return Err(DomainError::InvalidOrExpiredOtp);
            }
        }

        let insert = sqlx::query(
            r#"
            INSERT INTO users (
                id, email, password_hash, email_verified_at,
                is_active, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.id.to_string())
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.email_verified_at)
        .bind(user.is_active)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&mut *tx)
        .await;

        if let Err(e) = insert {
            if Self::is_duplicate_key(&e) {
                return Err(DomainError::AlreadyExists {
                    oauth_provider: None,
                });
            }
            return Err(DomainError::Database {
                message: format!("Failed to create user: {}", e),
            });
        }

        tx.commit().await.map_err(|e| DomainError::Database {
            message: format!("Failed to commit registration: {}", e),
        })?;

        info!(
            email = %mask_email(&user.email),
            user_id = %user.id,
            event = "user_created",
            "Created user"
        );
        Ok(user)
    }

    async fn update_password_consuming_otp(
        &self,
        email: &str,
        password_hash: &str,
        otp_id: Uuid,
    ) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| DomainError::Database {
            message: format!("Failed to begin transaction: {}", e),
        })?;

        // Serialization point for concurrent reset commits: exactly one
        // request flips the record, the rest see zero rows
        let rows = sqlx::query(
            r#"
            UPDATE otps
            SET status = 'used'
            WHERE id = ? AND status IN ('pending', 'verified') AND expires_at > ?
            "#,
        )
        .bind(otp_id.to_string())
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(|e| DomainError::Database {
            message: format!("Failed to consume OTP record: {}", e),
        })?
        .rows_affected();

        if rows == 0 {
            warn!(
                email = %mask_email(email),
                event = "otp_consume_conflict",
                "Password-reset commit lost the OTP consumption race"
            );
            return Err(DomainError::InvalidOrExpiredOtp);
        }

        let updated = sqlx::query(
            "UPDATE users SET password_hash = ?, updated_at = ? WHERE email = ?",
        )
        .bind(password_hash)
        .bind(Utc::now())
        .bind(email)
        .execute(&mut *tx)
        .await
        .map_err(|e| DomainError::Database {
            message: format!("Failed to update password: {}", e),
        })?
        .rows_affected();

        if updated == 0 {
            return Err(DomainError::UserNotFound);
        }

        // The consumed reset code is deleted outright rather than retained
        sqlx::query("DELETE FROM otps WHERE id = ?")
            .bind(otp_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::Database {
                message: format!("Failed to delete OTP record: {}", e),
            })?;

        tx.commit().await.map_err(|e| DomainError::Database {
            message: format!("Failed to commit password reset: {}", e),
        })?;

        info!(
            email = %mask_email(email),
            event = "password_updated",
            "Updated password"
        );
        Ok(())
    }
}

fn db_err(column: &'static str) -> impl Fn(sqlx::Error) -> DomainError {
    move |e| DomainError::Database {
        message: format!("Failed to get {}: {}", column, e),
    }
}
