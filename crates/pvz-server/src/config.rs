//! Runtime Configuration
//!
//! Read from Shuttle secrets. Every key is optional; missing keys fall back to
//! defaults suitable for local development.

use std::time::Duration;

use pvz::CityPolicy;

use crate::auth::JwtConfig;

const DEV_JWT_SECRET: &str = "dev-secret-key-change-in-production-min-32-chars-long";

/// Pool settings applied when `DATABASE_URL` overrides the provisioned database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub jwt: JwtConfig,
    pub cities: CityPolicy,
    pub cache_capacity: u64,
    pub max_page_limit: i64,
    pub database: Option<DatabaseConfig>,
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring unparsable {}={:?}", key, raw);
            default
        }),
        None => default,
    }
}

impl Config {
    /// Build from any key/value source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| {
                tracing::warn!("JWT_SECRET not set, using an insecure development key");
                DEV_JWT_SECRET.to_string()
            });

        let jwt = JwtConfig {
            secret,
            expiration_minutes: parse_or(&lookup, "JWT_EXPIRATION_MINUTES", 1440),
            issuer: lookup("JWT_ISSUER").unwrap_or_else(|| "pvz-server".to_string()),
        };

        let cities = match lookup("ALLOWED_CITIES") {
            Some(list) if !list.trim().is_empty() => CityPolicy::allow_list(list.split(',')),
            _ => CityPolicy::free_form(),
        };

        let database = lookup("DATABASE_URL")
            .filter(|url| !url.is_empty())
            .map(|url| DatabaseConfig {
                url,
                max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 10),
                min_connections: parse_or(&lookup, "DB_MIN_CONNECTIONS", 1),
                acquire_timeout: Duration::from_secs(parse_or(
                    &lookup,
                    "DB_ACQUIRE_TIMEOUT_SECS",
                    5,
                )),
                idle_timeout: Duration::from_secs(parse_or(&lookup, "DB_IDLE_TIMEOUT_SECS", 300)),
                max_lifetime: Duration::from_secs(parse_or(&lookup, "DB_MAX_LIFETIME_SECS", 1800)),
            });

        Self {
            jwt,
            cities,
            cache_capacity: parse_or(&lookup, "CACHE_CAPACITY", 10_000),
            max_page_limit: parse_or(&lookup, "MAX_PAGE_LIMIT", 30i64).max(1),
            database,
        }
    }

    pub fn from_secrets(secrets: &shuttle_runtime::SecretStore) -> Self {
        Self::from_lookup(|key| secrets.get(key))
    }
}
