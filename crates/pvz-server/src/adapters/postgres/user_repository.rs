//! PostgreSQL implementation of UserRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use pvz::{DomainError, User, UserRepository};

use super::{db_error, parse_column, violated_constraint, PgConn, USERS_EMAIL_KEY};

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    password_hash: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            role: parse_column("users.role", &row.role)?,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl UserRepository for PgConn {
    async fn find_user(&mut self, id: Uuid) -> Result<Option<User>, DomainError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, email, password_hash, role, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.conn())
        .await
        .map_err(db_error)?;

        row.map(User::try_from).transpose()
    }

    async fn find_user_by_email(&mut self, email: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, email, password_hash, role, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(self.conn())
        .await
        .map_err(db_error)?;

        row.map(User::try_from).transpose()
    }

    async fn insert_user(&mut self, user: &User) -> Result<User, DomainError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, email, password_hash, role, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, email, password_hash, role, created_at
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.created_at)
        .fetch_one(self.conn())
        .await
        .map_err(|e| match violated_constraint(&e) {
            Some(USERS_EMAIL_KEY) => DomainError::already_exists("User", &user.email),
            _ => db_error(e),
        })?;

        row.try_into()
    }
}
