//! City - Validation policy for PVZ city names

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

pub const CITY_MIN_LEN: usize = 2;
pub const CITY_MAX_LEN: usize = 100;

/// Which city names a PVZ may carry.
///
/// Length is always checked in characters, not bytes. An empty allow-list
/// means any name of valid length is accepted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CityPolicy {
    allowed: Vec<String>,
}

impl CityPolicy {
    /// Any city name of valid length
    pub fn free_form() -> Self {
        Self::default()
    }

    /// Only the listed cities (compared case-insensitively)
    pub fn allow_list<I, S>(cities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: cities
                .into_iter()
                .map(Into::into)
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect(),
        }
    }

    pub fn allowed(&self) -> &[String] {
        &self.allowed
    }

    /// Validate and normalize a city name.
    ///
    /// Returns the trimmed name, or the canonical spelling from the
    /// allow-list when one is configured.
    pub fn validate(&self, city: &str) -> Result<String, DomainError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(DomainError::invalid("city", "must not be empty"));
        }

        let len = city.chars().count();
        if !(CITY_MIN_LEN..=CITY_MAX_LEN).contains(&len) {
            return Err(DomainError::invalid(
                "city",
                format!(
                    "must be between {} and {} characters, got {}",
                    CITY_MIN_LEN, CITY_MAX_LEN, len
                ),
            ));
        }

        if self.allowed.is_empty() {
            return Ok(city.to_string());
        }

        let wanted = city.to_lowercase();
        self.allowed
            .iter()
            .find(|c| c.to_lowercase() == wanted)
            .cloned()
            .ok_or_else(|| {
                DomainError::invalid(
                    "city",
                    format!("{} is not one of: {}", city, self.allowed.join(", ")),
                )
            })
    }
}
