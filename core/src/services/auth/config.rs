//! Auth service configuration

/// Configuration for the auth orchestration service
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    /// bcrypt cost factor for password hashing
    pub bcrypt_cost: u32,
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self { bcrypt_cost: 10 }
    }
}

impl From<&fa_shared::config::AuthConfig> for AuthServiceConfig {
    fn from(config: &fa_shared::config::AuthConfig) -> Self {
        Self {
            bcrypt_cost: config.bcrypt_cost,
        }
    }
}
