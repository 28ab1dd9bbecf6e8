//! Mock implementation of UserRepository for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::otp::OtpStatus;
use crate::domain::entities::user::{OauthAccount, User};
use crate::errors::DomainError;
use crate::repositories::otp::SharedOtpStore;

use super::repository::UserRepository;

/// Mock user repository for testing
///
/// Shares an OTP store with [`crate::repositories::MockOtpRepository`] so the
/// composite commit operations mutate OTP state the way the transactional
/// MySQL implementation does.
pub struct MockUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
    oauth_accounts: Arc<RwLock<Vec<OauthAccount>>>,
    otps: SharedOtpStore,
    fail_on_commit: AtomicBool,
}

impl MockUserRepository {
    /// Create a new mock repository with its own (empty) OTP store
    pub fn new() -> Self {
        Self::with_otp_store(Arc::new(RwLock::new(HashMap::new())))
    }

    /// Create a mock repository sharing the given OTP store
    pub fn with_otp_store(otps: SharedOtpStore) -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            oauth_accounts: Arc::new(RwLock::new(Vec::new())),
            otps,
            fail_on_commit: AtomicBool::new(false),
        }
    }

    /// Seed an existing user
    pub async fn insert_user(&self, user: User) {
        self.users.write().await.insert(user.id, user);
    }

    /// Seed a linked OAuth account
    pub async fn insert_oauth_account(&self, account: OauthAccount) {
        self.oauth_accounts.write().await.push(account);
    }

    /// Make every subsequent commit operation fail before writing anything
    pub fn fail_on_commit(&self) {
        self.fail_on_commit.store(true, Ordering::SeqCst);
    }

    /// Number of stored users, for assertions
    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }
}

impl Default for MockUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError> {
        let users = self.users.read().await;
        Ok(users.values().any(|u| u.email == email))
    }

    async fn find_oauth_provider(&self, user_id: Uuid) -> Result<Option<String>, DomainError> {
        let accounts = self.oauth_accounts.read().await;
        Ok(accounts
            .iter()
            .find(|a| a.user_id == user_id)
            .map(|a| a.provider.clone()))
    }

    async fn create_user_consuming_otp(
        &self,
        user: User,
        otp_id: Option<Uuid>,
    ) -> Result<User, DomainError> {
        // Lock ordering: users before otps, matching the reset commit below
        let mut users = self.users.write().await;
        let mut otps = self.otps.write().await;

        if self.fail_on_commit.load(Ordering::SeqCst) {
            return Err(DomainError::Database {
                message: "simulated store failure".to_string(),
            });
        }

        if users.values().any(|u| u.email == user.email) {
            return Err(DomainError::AlreadyExists {
                oauth_provider: None,
            });
        }

        if let Some(id) = otp_id {
            match otps.get_mut(&id) {
                Some(record) if record.status == OtpStatus::Verified => {
                    record.status = OtpStatus::Used;
                }
                _ => return Err(DomainError::InvalidOrExpiredOtp),
            }
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_password_consuming_otp(
        &self,
        email: &str,
        password_hash: &str,
        otp_id: Uuid,
    ) -> Result<(), DomainError> {
        let mut users = self.users.write().await;
        let mut otps = self.otps.write().await;

        if self.fail_on_commit.load(Ordering::SeqCst) {
            return Err(DomainError::Database {
                message: "simulated store failure".to_string(),
            });
        }

        // Guarded consume first: the losing side of a concurrent commit
        // stops here with the generic error
        match otps.get(&otp_id) {
            Some(record) if record.is_consumable() => {}
            _ => return Err(DomainError::InvalidOrExpiredOtp),
        }

        let user = users
            .values_mut()
            .find(|u| u.email == email)
            .ok_or(DomainError::UserNotFound)?;

        user.set_password_hash(password_hash.to_string());
        otps.remove(&otp_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::otp::{OtpPurpose, OtpRecord};

    #[tokio::test]
    async fn test_create_consumes_verified_otp() {
        let repo = MockUserRepository::new();
        let mut record = OtpRecord::new("user@example.com".to_string(), OtpPurpose::Registration);
        record.mark_verified().unwrap();
        let otp_id = record.id;
        repo.otps.write().await.insert(otp_id, record);

        let user = User::new_registered("user@example.com".to_string(), "$2b$10$h".to_string());
        repo.create_user_consuming_otp(user, Some(otp_id))
            .await
            .unwrap();

        let otps = repo.otps.read().await;
        assert_eq!(otps.get(&otp_id).unwrap().status, OtpStatus::Used);
    }

    #[tokio::test]
    async fn test_create_rejects_unverified_otp() {
        let repo = MockUserRepository::new();
        let record = OtpRecord::new("user@example.com".to_string(), OtpPurpose::Registration);
        let otp_id = record.id;
        repo.otps.write().await.insert(otp_id, record);

        let user = User::new_registered("user@example.com".to_string(), "$2b$10$h".to_string());
        let result = repo.create_user_consuming_otp(user, Some(otp_id)).await;

        assert!(matches!(result, Err(DomainError::InvalidOrExpiredOtp)));
        assert_eq!(repo.user_count().await, 0);
    }

    #[tokio::test]
    async fn test_update_password_deletes_otp() {
        let repo = MockUserRepository::new();
        repo.insert_user(User::new_registered(
            "user@example.com".to_string(),
            "$2b$10$old".to_string(),
        ))
        .await;

        let record = OtpRecord::new("user@example.com".to_string(), OtpPurpose::PasswordReset);
        let otp_id = record.id;
        repo.otps.write().await.insert(otp_id, record);

        repo.update_password_consuming_otp("user@example.com", "$2b$10$new", otp_id)
            .await
            .unwrap();

        let user = repo.find_by_email("user@example.com").await.unwrap().unwrap();
        assert_eq!(user.password_hash.as_deref(), Some("$2b$10$new"));
        assert!(repo.otps.read().await.get(&otp_id).is_none());
    }

    #[tokio::test]
    async fn test_commit_failure_writes_nothing() {
        let repo = MockUserRepository::new();
        repo.insert_user(User::new_registered(
            "user@example.com".to_string(),
            "$2b$10$old".to_string(),
        ))
        .await;
        let record = OtpRecord::new("user@example.com".to_string(), OtpPurpose::PasswordReset);
        let otp_id = record.id;
        repo.otps.write().await.insert(otp_id, record);

        repo.fail_on_commit();
        let result = repo
            .update_password_consuming_otp("user@example.com", "$2b$10$new", otp_id)
            .await;

        assert!(matches!(result, Err(DomainError::Database { .. })));
        let user = repo.find_by_email("user@example.com").await.unwrap().unwrap();
        assert_eq!(user.password_hash.as_deref(), Some("$2b$10$old"));
        assert!(repo.otps.read().await.get(&otp_id).is_some());
    }
}
