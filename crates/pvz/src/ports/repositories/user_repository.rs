//! User Repository Port

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{errors::DomainError, User};

/// Repository interface for User entities
#[async_trait]
pub trait UserRepository: Send {
    async fn find_user(&mut self, id: Uuid) -> Result<Option<User>, DomainError>;

    async fn find_user_by_email(&mut self, email: &str) -> Result<Option<User>, DomainError>;

    /// Insert a new User; fails with `AlreadyExists` on a taken email
    async fn insert_user(&mut self, user: &User) -> Result<User, DomainError>;
}
