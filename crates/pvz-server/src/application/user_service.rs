//! User Application Service (Use Case)
//!
//! Registration and credential checks. Token issuance lives in `auth`.

use pvz::{DomainError, Role, Store, User, UserRepository};

use super::transaction::TransactionCoordinator;
use crate::auth::{hash_password, verify_password};

pub const MIN_PASSWORD_LEN: usize = 6;

fn normalize_email(email: &str) -> Result<String, DomainError> {
    let email = email.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(email),
        _ => Err(DomainError::invalid("email", "must look like name@domain.tld")),
    }
}

/// Application service for User operations
pub struct UserService<S: Store> {
    tx: TransactionCoordinator<S>,
}

impl<S: Store> UserService<S> {
    pub fn new(tx: TransactionCoordinator<S>) -> Self {
        Self { tx }
    }

    /// Create a user with a hashed password
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<User, DomainError> {
        let email = normalize_email(email)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(DomainError::invalid(
                "password",
                format!("must be at least {} characters", MIN_PASSWORD_LEN),
            ));
        }

        let password_hash = hash_password(password).map_err(DomainError::internal)?;
        let user = self
            .tx
            .connect()
            .await?
            .insert_user(&User::new(email, password_hash, role))
            .await?;

        tracing::info!("Registered user {} ({})", user.id, user.role);

        Ok(user)
    }

    /// Check email and password
    pub async fn login(&self, email: &str, password: &str) -> Result<User, DomainError> {
        let email = normalize_email(email)
            .map_err(|_| DomainError::Unauthorized("invalid credentials".to_string()))?;

        let user = self.tx.connect().await?.find_user_by_email(&email).await?;

        match user {
            Some(user) if verify_password(password, &user.password_hash) => Ok(user),
            _ => {
                tracing::warn!("Failed login for {}", email);
                Err(DomainError::Unauthorized("invalid credentials".to_string()))
            }
        }
    }

    /// The shared per-role user behind dummy logins, created on first use
    pub async fn dummy_login(&self, role: Role) -> Result<User, DomainError> {
        let email = format!("dummy-{}@pvz.local", role.as_str());
        let mut conn = self.tx.connect().await?;

        if let Some(user) = conn.find_user_by_email(&email).await? {
            return Ok(user);
        }

        // Empty hash never verifies, so the account cannot log in by password
        match conn
            .insert_user(&User::new(email.clone(), String::new(), role))
            .await
        {
            Ok(user) => {
                tracing::info!("Created dummy user {} ({})", user.id, role);
                Ok(user)
            }
            Err(DomainError::AlreadyExists { .. }) => conn
                .find_user_by_email(&email)
                .await?
                .ok_or_else(|| DomainError::not_found("User", email)),
            Err(e) => Err(e),
        }
    }
}
