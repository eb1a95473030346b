//! Bearer Token Authentication
//!
//! HS256 JWTs carrying the user id and role, argon2 password hashes, and the
//! middleware that turns a valid token into an `AuthUser` request extension.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use pvz::{DomainError, Role};

use crate::routes::error::ApiError;
use crate::AppState;

/// JWT settings
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_minutes: i64,
    pub issuer: String,
}

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
}

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    ExpiredToken,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Token generation failed: {0}")]
    GenerationFailed(String),
}

impl From<JwtError> for DomainError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::GenerationFailed(_) => DomainError::internal(err),
            _ => DomainError::Unauthorized(err.to_string()),
        }
    }
}

/// Issues and validates tokens
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            config,
        }
    }

    pub fn generate_token(&self, user_id: Uuid, role: Role) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            role,
            exp: (now + Duration::minutes(self.config.expiration_minutes)).timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                _ => JwtError::InvalidToken(e.to_string()),
            })
    }
}

/// Caller identity taken from a validated token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: Role,
}

impl AuthUser {
    /// Fail with AccessDenied unless the role is allowed
    pub fn require(&self, allowed: bool, action: &'static str) -> Result<(), DomainError> {
        if allowed {
            Ok(())
        } else {
            tracing::warn!("User {} ({}) denied: {}", self.user_id, self.role, action);
            Err(DomainError::AccessDenied {
                role: self.role,
                action,
            })
        }
    }
}

impl TryFrom<Claims> for AuthUser {
    type Error = JwtError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let user_id = claims
            .sub
            .parse()
            .map_err(|_| JwtError::InvalidToken("subject is not a user id".to_string()))?;
        Ok(Self {
            user_id,
            role: claims.role,
        })
    }
}

/// Authentication middleware
/// Validates the Bearer token and stores `AuthUser` in the request extensions
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| {
            tracing::warn!("Missing or malformed Authorization header");
            DomainError::Unauthorized("missing bearer token".to_string())
        })?;

    let user = state
        .jwt
        .validate_token(token)
        .and_then(AuthUser::try_from)
        .map_err(|e| {
            tracing::warn!("Rejected token: {}", e);
            DomainError::from(e)
        })?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    use argon2::password_hash::rand_core::OsRng;
    use argon2::password_hash::SaltString;
    use argon2::{Argon2, PasswordHasher};

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};

    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(secret: &str) -> JwtService {
        JwtService::new(JwtConfig {
            secret: secret.to_string(),
            expiration_minutes: 60,
            issuer: "pvz-server".to_string(),
        })
    }

    #[test]
    fn test_token_round_trip() {
        let jwt = service("test-secret-at-least-32-bytes-long!!");
        let user_id = Uuid::new_v4();

        let token = jwt.generate_token(user_id, Role::Employee).unwrap();
        let user = AuthUser::try_from(jwt.validate_token(&token).unwrap()).unwrap();

        assert_eq!(
            user,
            AuthUser {
                user_id,
                role: Role::Employee
            }
        );
    }

    #[test]
    fn test_tampered_token_rejected() {
        let jwt = service("test-secret-at-least-32-bytes-long!!");
        let token = jwt.generate_token(Uuid::new_v4(), Role::Employee).unwrap();

        // Admin payload under the employee token's signature
        let admin = jwt.generate_token(Uuid::new_v4(), Role::Admin).unwrap();
        let parts: Vec<&str> = token.split('.').collect();
        let admin_parts: Vec<&str> = admin.split('.').collect();
        let forged = format!("{}.{}.{}", parts[0], admin_parts[1], parts[2]);

        assert!(matches!(
            jwt.validate_token(&forged),
            Err(JwtError::InvalidSignature)
        ));
    }

    #[test]
    fn test_foreign_secret_rejected() {
        let token = service("one-secret-at-least-32-bytes-long!!!")
            .generate_token(Uuid::new_v4(), Role::Admin)
            .unwrap();
        let err = service("other-secret-at-least-32-bytes-long!")
            .validate_token(&token)
            .unwrap_err();
        assert!(matches!(err, JwtError::InvalidSignature));
        assert!(matches!(DomainError::from(err), DomainError::Unauthorized(_)));
    }

    #[test]
    fn test_expired_token_rejected() {
        let jwt = JwtService::new(JwtConfig {
            secret: "test-secret-at-least-32-bytes-long!!".to_string(),
            expiration_minutes: -10,
            issuer: "pvz-server".to_string(),
        });
        let token = jwt.generate_token(Uuid::new_v4(), Role::Admin).unwrap();
        assert!(matches!(
            jwt.validate_token(&token),
            Err(JwtError::ExpiredToken)
        ));
    }

    #[test]
    fn test_require_role() {
        let user = AuthUser {
            user_id: Uuid::new_v4(),
            role: Role::Employee,
        };
        assert!(user.require(user.role.can_view_pvz(), "view PVZ").is_ok());
        assert!(matches!(
            user.require(user.role.can_manage_pvz(), "create PVZ"),
            Err(DomainError::AccessDenied { .. })
        ));
    }

    #[test]
    fn test_password_hash_verifies() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("battery staple", &hash));
        assert!(!verify_password("", ""));
    }
}
