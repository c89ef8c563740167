//! Authentication service
//!
//! Provides password hashing with Argon2 and user authentication.

use anyhow::Result;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use sqlx::SqlitePool;
use tracing::warn;

use crate::config::AuthConfig;
use crate::db::user_repository::UserRepository;
use crate::models::User;
use crate::utils::AppError;

/// Authentication service for user management
pub struct AuthService {
    users: UserRepository,
}

impl AuthService {
    /// Create a new auth service
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Hash a password using Argon2id
    pub fn hash_password(password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
            .to_string();
        Ok(password_hash)
    }

    /// Verify a password against a hash
    pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
        let parsed_hash = PasswordHash::new(password_hash)
            .map_err(|e| anyhow::anyhow!("Invalid password hash format: {}", e))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Authenticate a user by username and password
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, AppError> {
        let user = self.users.find_by_username(username).await?;

        match user {
            Some(user) => {
                if Self::verify_password(password, &user.password_hash)? {
                    Ok(Some(user))
                } else {
                    Ok(None)
                }
            }
            None => Ok(None),
        }
    }

    /// Look up a user by id
    pub async fn get_user(&self, id: uuid::Uuid) -> Result<Option<User>, AppError> {
        self.users.find_by_id(id).await
    }

    /// Seed the bootstrap admin account when the user table is empty
    pub async fn ensure_bootstrap_admin(&self, config: &AuthConfig) -> Result<(), AppError> {
        if self.users.count().await? > 0 {
            return Ok(());
        }

        let password_hash = Self::hash_password(&config.bootstrap_admin_password)?;
        let user = User::new(
            config.bootstrap_admin_username.clone(),
            password_hash,
            "Administrator".to_string(),
            "admin".to_string(),
        );
        self.users.create(&user).await?;

        warn!(
            username = %config.bootstrap_admin_username,
            "created bootstrap admin account; change its password"
        );
        Ok(())
    }
}
