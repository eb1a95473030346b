//! Reception Application Service (Use Case)
//!
//! Opens and closes receptions. At most one reception per PVZ is in progress;
//! the check and the write happen in the same transaction and the store's
//! unique constraint settles concurrent opens.

use uuid::Uuid;

use pvz::{DomainError, PvzRepository, Reception, ReceptionRepository, Store};

use super::check_window;
use super::transaction::TransactionCoordinator;
use crate::cache::EntityCaches;

/// Application service for Reception operations
pub struct ReceptionService<S: Store> {
    tx: TransactionCoordinator<S>,
    cache: EntityCaches,
}

impl<S: Store> ReceptionService<S> {
    pub fn new(tx: TransactionCoordinator<S>, cache: EntityCaches) -> Self {
        Self { tx, cache }
    }

    /// Open a new reception at a PVZ
    pub async fn create(&self, pvz_id: Uuid) -> Result<Reception, DomainError> {
        let reception = self
            .tx
            .run(move |conn| {
                Box::pin(async move {
                    conn.find_pvz(pvz_id)
                        .await?
                        .ok_or_else(|| DomainError::not_found("Pvz", pvz_id))?;

                    if conn.find_open_reception(pvz_id).await?.is_some() {
                        return Err(DomainError::AlreadyOpen { pvz_id });
                    }

                    conn.insert_reception(&Reception::new(pvz_id)).await
                })
            })
            .await?;

        tracing::info!("Opened reception {} at PVZ {}", reception.id, pvz_id);

        Ok(reception)
    }

    /// Close the in-progress reception of a PVZ
    pub async fn close(&self, pvz_id: Uuid) -> Result<Reception, DomainError> {
        let closed = self
            .tx
            .run(move |conn| {
                Box::pin(async move {
                    if let Some(open) = conn.find_open_reception(pvz_id).await? {
                        return conn
                            .close_reception(open.id)
                            .await?
                            .ok_or(DomainError::AlreadyClosed {
                                reception_id: open.id,
                            });
                    }

                    conn.find_pvz(pvz_id)
                        .await?
                        .ok_or_else(|| DomainError::not_found("Pvz", pvz_id))?;

                    match conn.find_latest_reception(pvz_id).await? {
                        Some(latest) if !latest.is_open() => Err(DomainError::AlreadyClosed {
                            reception_id: latest.id,
                        }),
                        _ => Err(DomainError::not_found("open Reception of PVZ", pvz_id)),
                    }
                })
            })
            .await?;

        self.cache.receptions.invalidate(&closed.id).await;
        tracing::info!("Closed reception {} at PVZ {}", closed.id, pvz_id);

        Ok(closed)
    }

    /// Get a Reception by ID
    pub async fn get_by_id(&self, id: Uuid) -> Result<Reception, DomainError> {
        if let Some(reception) = self.cache.receptions.get(&id).await {
            return Ok(reception);
        }

        let seen = self.cache.receptions.generation();
        let reception = self
            .tx
            .connect()
            .await?
            .find_reception(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Reception", id))?;

        self.cache
            .receptions
            .insert(id, reception.clone(), seen)
            .await;
        Ok(reception)
    }

    /// The in-progress reception of a PVZ
    pub async fn get_open_by_pvz_id(&self, pvz_id: Uuid) -> Result<Reception, DomainError> {
        self.tx
            .connect()
            .await?
            .find_open_reception(pvz_id)
            .await?
            .ok_or_else(|| DomainError::not_found("open Reception of PVZ", pvz_id))
    }

    /// List a window of receptions, newest first
    pub async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Reception>, DomainError> {
        check_window(offset, limit)?;
        self.tx.connect().await?.list_receptions(offset, limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{seed_pvz, Fixture};
    use pvz::ReceptionStatus;

    #[tokio::test]
    async fn test_open_and_close() {
        let fx = Fixture::new();
        let pvz = seed_pvz(&fx, "Москва").await;

        let reception = fx.receptions.create(pvz.id).await.unwrap();
        assert_eq!(reception.pvz_id, pvz.id);
        assert_eq!(reception.status, ReceptionStatus::InProgress);
        assert_eq!(
            fx.receptions.get_open_by_pvz_id(pvz.id).await.unwrap().id,
            reception.id
        );

        let closed = fx.receptions.close(pvz.id).await.unwrap();
        assert_eq!(closed.id, reception.id);
        assert_eq!(closed.status, ReceptionStatus::Closed);
        assert_eq!(closed.date_time, reception.date_time);
        assert!(matches!(
            fx.receptions.get_open_by_pvz_id(pvz.id).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_second_open_reception_rejected() {
        let fx = Fixture::new();
        let pvz = seed_pvz(&fx, "Москва").await;

        fx.receptions.create(pvz.id).await.unwrap();
        let err = fx.receptions.create(pvz.id).await.unwrap_err();
        assert!(matches!(err, DomainError::AlreadyOpen { pvz_id } if pvz_id == pvz.id));
    }

    #[tokio::test]
    async fn test_concurrent_opens_yield_one_reception() {
        let fx = Fixture::new();
        let pvz = seed_pvz(&fx, "Москва").await;

        let (a, b) = tokio::join!(fx.receptions.create(pvz.id), fx.receptions.create(pvz.id));

        let outcomes = [a, b];
        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(outcomes
            .iter()
            .any(|r| matches!(r, Err(DomainError::AlreadyOpen { .. }))));
    }

    #[tokio::test]
    async fn test_reopen_after_close() {
        let fx = Fixture::new();
        let pvz = seed_pvz(&fx, "Москва").await;

        let first = fx.receptions.create(pvz.id).await.unwrap();
        fx.receptions.close(pvz.id).await.unwrap();
        let second = fx.receptions.create(pvz.id).await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(
            fx.receptions.get_by_id(first.id).await.unwrap().status,
            ReceptionStatus::Closed
        );
    }

    #[tokio::test]
    async fn test_close_twice_is_already_closed() {
        let fx = Fixture::new();
        let pvz = seed_pvz(&fx, "Москва").await;
        let reception = fx.receptions.create(pvz.id).await.unwrap();

        fx.receptions.close(pvz.id).await.unwrap();
        let err = fx.receptions.close(pvz.id).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::AlreadyClosed { reception_id } if reception_id == reception.id
        ));
    }

    #[tokio::test]
    async fn test_close_never_opened_is_not_found() {
        let fx = Fixture::new();
        let pvz = seed_pvz(&fx, "Москва").await;

        let err = fx.receptions.close(pvz.id).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_unknown_pvz_is_not_found() {
        let fx = Fixture::new();
        let missing = Uuid::new_v4();

        assert!(matches!(
            fx.receptions.create(missing).await,
            Err(DomainError::NotFound { entity: "Pvz", .. })
        ));
        assert!(matches!(
            fx.receptions.close(missing).await,
            Err(DomainError::NotFound { entity: "Pvz", .. })
        ));
    }

    #[tokio::test]
    async fn test_cached_reception_refreshed_after_close() {
        let fx = Fixture::new();
        let pvz = seed_pvz(&fx, "Москва").await;
        let reception = fx.receptions.create(pvz.id).await.unwrap();

        assert!(fx.receptions.get_by_id(reception.id).await.unwrap().is_open());
        fx.receptions.close(pvz.id).await.unwrap();
        assert!(!fx.receptions.get_by_id(reception.id).await.unwrap().is_open());
    }

    #[tokio::test]
    async fn test_read_racing_close_leaves_no_stale_entry() {
        let fx = Fixture::new();
        let pvz = seed_pvz(&fx, "Москва").await;
        let reception = fx.receptions.create(pvz.id).await.unwrap();

        // A reader misses the cache and loads the reception while it is open
        let seen = fx.caches.receptions.generation();
        let loaded = fx
            .store
            .connect()
            .await
            .unwrap()
            .find_reception(reception.id)
            .await
            .unwrap()
            .unwrap();
        assert!(loaded.is_open());

        // The close commits before the reader fills the cache
        fx.receptions.close(pvz.id).await.unwrap();
        fx.caches
            .receptions
            .insert(reception.id, loaded, seen)
            .await;

        let fetched = fx.receptions.get_by_id(reception.id).await.unwrap();
        assert_eq!(fetched.status, ReceptionStatus::Closed);
    }

    #[tokio::test]
    async fn test_shutdown_refuses_new_receptions() {
        let fx = Fixture::new();
        let pvz = seed_pvz(&fx, "Москва").await;

        fx.shutdown.cancel();
        let err = fx.receptions.create(pvz.id).await.unwrap_err();
        assert!(matches!(err, DomainError::Cancelled));
        assert!(fx.receptions.list(0, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let fx = Fixture::new();
        let moscow = seed_pvz(&fx, "Москва").await;
        let kazan = seed_pvz(&fx, "Казань").await;
        fx.receptions.create(moscow.id).await.unwrap();
        let latest = fx.receptions.create(kazan.id).await.unwrap();

        let listed = fx.receptions.list(0, 10).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, latest.id);

        assert_eq!(fx.receptions.list(1, 10).await.unwrap().len(), 1);
        assert!(matches!(
            fx.receptions.list(-1, 10).await,
            Err(DomainError::InvalidInput { .. })
        ));
    }
}
