//! User entity representing a registered account in the FormAI system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User entity representing a registered account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    /// Normalized (trimmed, lower-cased) email address; unique at the store level
    pub email: String,

    /// bcrypt hash of the password; `None` for OAuth-only accounts
    pub password_hash: Option<String>,

    /// When the email address was verified, if ever
    pub email_verified_at: Option<DateTime<Utc>>,

    /// Whether the account is active
    pub is_active: bool,

    /// Timestamp when the user was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the user was last updated
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new unverified, inactive user shell
    pub fn new(email: String, password_hash: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
            email_verified_at: None,
            is_active: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Creates a user for a registration commit: email verified now, active
    ///
    /// Registration only completes after the OTP proved control of the
    /// address, so the row is born verified.
    pub fn new_registered(email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash: Some(password_hash),
            email_verified_at: Some(now),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether this account can authenticate with a password at all
    pub fn has_password(&self) -> bool {
        self.password_hash.is_some()
    }

    /// Marks the email address as verified
    pub fn verify_email(&mut self) {
        self.email_verified_at = Some(Utc::now());
        self.updated_at = Utc::now();
    }

    /// Replaces the stored password hash
    pub fn set_password_hash(&mut self, hash: String) {
        self.password_hash = Some(hash);
        self.updated_at = Utc::now();
    }
}

/// A third-party OAuth account linked to a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OauthAccount {
    /// Unique identifier for the link
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// Provider name, lower-cased (e.g. "google")
    pub provider: String,

    /// Account identifier at the provider
    pub provider_account_id: String,

    /// Timestamp when the link was created
    pub created_at: DateTime<Utc>,
}

impl OauthAccount {
    pub fn new(user_id: Uuid, provider: String, provider_account_id: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            provider,
            provider_account_id,
            created_at: Utc::now(),
        }
    }
}
