//! PVZ Application Service (Use Case)
//!
//! Orchestrates PVZ management: city validation, per-city uniqueness,
//! role checks and audit attribution.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use pvz::{
    AuditLogEntry, AuditLogRepository, CityPolicy, DomainError, Pvz, PvzReceptionFilter,
    PvzRepository, PvzWithReceptions, Store, User, UserRepository,
};

use super::audit_log::AuditLog;
use super::transaction::TransactionCoordinator;
use super::{check_window, page_offset};
use crate::cache::EntityCaches;

/// Application service for PVZ operations
pub struct PvzService<S: Store> {
    tx: TransactionCoordinator<S>,
    cache: EntityCaches,
    cities: CityPolicy,
    max_page_limit: i64,
}

impl<S: Store> PvzService<S> {
    pub fn new(
        tx: TransactionCoordinator<S>,
        cache: EntityCaches,
        cities: CityPolicy,
        max_page_limit: i64,
    ) -> Self {
        Self {
            tx,
            cache,
            cities,
            max_page_limit,
        }
    }

    /// Resolve the acting user and require PVZ management rights
    async fn authorize(&self, user_id: Uuid, action: &'static str) -> Result<User, DomainError> {
        let mut conn = self.tx.connect().await?;
        let user = conn
            .find_user(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", user_id))?;

        if !user.role.can_manage_pvz() {
            tracing::warn!("User {} ({}) denied: {}", user.id, user.role, action);
            return Err(DomainError::AccessDenied {
                role: user.role,
                action,
            });
        }

        Ok(user)
    }

    /// Create a PVZ and record who created it
    pub async fn create(&self, city: &str, user_id: Uuid) -> Result<Pvz, DomainError> {
        let city = self.cities.validate(city)?;
        self.authorize(user_id, "create PVZ").await?;

        let pvz = self
            .tx
            .run(move |conn| {
                Box::pin(async move {
                    if conn.find_pvz_by_city(&city).await?.is_some() {
                        return Err(DomainError::already_exists("Pvz", city));
                    }
                    let pvz = conn.insert_pvz(&Pvz::new(city)).await?;
                    AuditLog::log_pvz_creation(conn, pvz.id, user_id).await?;
                    Ok(pvz)
                })
            })
            .await?;

        tracing::info!("Created PVZ: {} ({}) by {}", pvz.city, pvz.id, user_id);

        Ok(pvz)
    }

    /// Rename a PVZ. Only the city is mutable.
    pub async fn update(&self, pvz: Pvz, moderator_id: Uuid) -> Result<Pvz, DomainError> {
        let city = self.cities.validate(&pvz.city)?;
        self.authorize(moderator_id, "update PVZ").await?;
        let id = pvz.id;

        let updated = self
            .tx
            .run(move |conn| {
                Box::pin(async move {
                    let current = conn
                        .find_pvz(id)
                        .await?
                        .ok_or_else(|| DomainError::not_found("Pvz", id))?;

                    if let Some(other) = conn.find_pvz_by_city(&city).await? {
                        if other.id != id {
                            return Err(DomainError::already_exists("Pvz", city));
                        }
                    }

                    let updated = conn
                        .update_pvz(&Pvz { city, ..current })
                        .await?
                        .ok_or_else(|| DomainError::not_found("Pvz", id))?;
                    AuditLog::log_pvz_update(conn, id, moderator_id).await?;
                    Ok(updated)
                })
            })
            .await?;

        self.cache.pvz.invalidate(&id).await;
        tracing::info!("Updated PVZ: {} ({}) by {}", updated.city, id, moderator_id);

        Ok(updated)
    }

    /// Delete a PVZ together with its receptions and products
    pub async fn delete(&self, id: Uuid, moderator_id: Uuid) -> Result<(), DomainError> {
        self.authorize(moderator_id, "delete PVZ").await?;

        self.tx
            .run(move |conn| {
                Box::pin(async move {
                    conn.find_pvz(id)
                        .await?
                        .ok_or_else(|| DomainError::not_found("Pvz", id))?;
                    if !conn.delete_pvz(id).await? {
                        return Err(DomainError::not_found("Pvz", id));
                    }
                    AuditLog::log_pvz_deletion(conn, id, moderator_id).await?;
                    Ok(())
                })
            })
            .await?;

        self.cache.pvz.invalidate(&id).await;
        self.cache.receptions.invalidate_all();
        self.cache.products.invalidate_all();
        tracing::info!("Deleted PVZ: {} by {}", id, moderator_id);

        Ok(())
    }

    /// Get a PVZ by ID
    pub async fn get_by_id(&self, id: Uuid) -> Result<Pvz, DomainError> {
        if let Some(pvz) = self.cache.pvz.get(&id).await {
            return Ok(pvz);
        }

        let seen = self.cache.pvz.generation();
        let pvz = self
            .tx
            .connect()
            .await?
            .find_pvz(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Pvz", id))?;

        self.cache.pvz.insert(id, pvz.clone(), seen).await;
        Ok(pvz)
    }

    /// Get all PVZs, newest first
    pub async fn get_all(&self) -> Result<Vec<Pvz>, DomainError> {
        self.tx.connect().await?.find_all_pvz().await
    }

    /// List a window of PVZs, newest first
    pub async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Pvz>, DomainError> {
        check_window(offset, limit)?;
        self.tx.connect().await?.list_pvz(offset, limit).await
    }

    /// One page of PVZs with the receptions (and their products) whose
    /// date_time falls in `[start, end]`
    pub async fn get_with_receptions(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        page: i64,
        limit: i64,
    ) -> Result<Vec<PvzWithReceptions>, DomainError> {
        if limit > self.max_page_limit {
            return Err(DomainError::invalid(
                "limit",
                format!("must be at most {}", self.max_page_limit),
            ));
        }
        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(DomainError::invalid(
                    "start_date",
                    "must not be after end_date",
                ));
            }
        }

        let filter = PvzReceptionFilter {
            start,
            end,
            offset: page_offset(page, limit)?,
            limit,
        };

        self.tx
            .connect()
            .await?
            .list_pvz_with_receptions(&filter)
            .await
    }

    /// Audit entries of a PVZ, oldest first
    pub async fn audit_history(
        &self,
        pvz_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vec<AuditLogEntry>, DomainError> {
        self.authorize(user_id, "read PVZ audit log").await?;
        self.tx.connect().await?.find_audit_entries(pvz_id).await
    }
}
