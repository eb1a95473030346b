//! In-memory Store for tests
//!
//! Transactions take the whole store exclusively and work on a staged copy
//! that replaces the live tables on commit, so isolation is serializable and
//! dropping an uncommitted handle discards its writes. The same constraints as
//! the Postgres schema are enforced: unique city, one open reception per PVZ,
//! foreign keys, cascade from PVZ.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use pvz::{
    AuditLogEntry, AuditLogRepository, DomainError, Product, ProductRepository, Pvz, PvzJoinRow,
    PvzReceptionFilter, PvzRepository, PvzWithReceptions, Reception, ReceptionRepository,
    ReceptionStatus, Store, UnitOfWork, User, UserRepository,
};

#[derive(Debug, Clone, Default)]
struct Tables {
    pvz: Vec<Pvz>,
    receptions: Vec<Reception>,
    products: Vec<Product>,
    users: Vec<User>,
    audit: Vec<AuditLogEntry>,
}

fn window<T: Clone>(items: Vec<T>, offset: i64, limit: i64) -> Vec<T> {
    items
        .into_iter()
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .collect()
}

impl Tables {
    fn pvz_newest_first(&self) -> Vec<Pvz> {
        let mut all = self.pvz.clone();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        all
    }

    fn insert_pvz(&mut self, pvz: &Pvz) -> Result<Pvz, DomainError> {
        if self.pvz.iter().any(|p| p.city == pvz.city) {
            return Err(DomainError::already_exists("Pvz", &pvz.city));
        }
        self.pvz.push(pvz.clone());
        Ok(pvz.clone())
    }

    fn update_pvz(&mut self, pvz: &Pvz) -> Result<Option<Pvz>, DomainError> {
        if self
            .pvz
            .iter()
            .any(|p| p.city == pvz.city && p.id != pvz.id)
        {
            return Err(DomainError::already_exists("Pvz", &pvz.city));
        }
        Ok(self.pvz.iter_mut().find(|p| p.id == pvz.id).map(|p| {
            p.city = pvz.city.clone();
            p.clone()
        }))
    }

    fn delete_pvz(&mut self, id: Uuid) -> bool {
        let before = self.pvz.len();
        self.pvz.retain(|p| p.id != id);
        if self.pvz.len() == before {
            return false;
        }

        let owned: Vec<Uuid> = self
            .receptions
            .iter()
            .filter(|r| r.pvz_id == id)
            .map(|r| r.id)
            .collect();
        self.receptions.retain(|r| r.pvz_id != id);
        self.products.retain(|p| !owned.contains(&p.reception_id));
        true
    }

    fn pvz_with_receptions(&self, filter: &PvzReceptionFilter) -> Vec<PvzWithReceptions> {
        let qualifying: Vec<Pvz> = self
            .pvz_newest_first()
            .into_iter()
            .filter(|p| {
                !filter.is_bounded()
                    || self
                        .receptions
                        .iter()
                        .any(|r| r.pvz_id == p.id && filter.contains(r.date_time))
            })
            .collect();

        let mut rows = Vec::new();
        for pvz in window(qualifying, filter.offset, filter.limit) {
            let mut receptions: Vec<&Reception> = self
                .receptions
                .iter()
                .filter(|r| r.pvz_id == pvz.id && filter.contains(r.date_time))
                .collect();
            receptions.sort_by_key(|r| r.date_time);

            if receptions.is_empty() {
                rows.push(PvzJoinRow {
                    pvz: pvz.clone(),
                    reception: None,
                    product: None,
                });
            }

            for reception in receptions {
                let products: Vec<&Product> = self
                    .products
                    .iter()
                    .filter(|p| p.reception_id == reception.id)
                    .collect();

                if products.is_empty() {
                    rows.push(PvzJoinRow {
                        pvz: pvz.clone(),
                        reception: Some(reception.clone()),
                        product: None,
                    });
                }
                for product in products {
                    rows.push(PvzJoinRow {
                        pvz: pvz.clone(),
                        reception: Some(reception.clone()),
                        product: Some(product.clone()),
                    });
                }
            }
        }

        PvzWithReceptions::group(rows)
    }

    fn insert_reception(&mut self, reception: &Reception) -> Result<Reception, DomainError> {
        if !self.pvz.iter().any(|p| p.id == reception.pvz_id) {
            return Err(DomainError::not_found("Pvz", reception.pvz_id));
        }
        if reception.is_open()
            && self
                .receptions
                .iter()
                .any(|r| r.pvz_id == reception.pvz_id && r.is_open())
        {
            return Err(DomainError::AlreadyOpen {
                pvz_id: reception.pvz_id,
            });
        }
        self.receptions.push(reception.clone());
        Ok(reception.clone())
    }

    fn close_reception(&mut self, id: Uuid) -> Option<Reception> {
        self.receptions
            .iter_mut()
            .find(|r| r.id == id && r.is_open())
            .map(|r| {
                r.status = ReceptionStatus::Closed;
                r.clone()
            })
    }

    fn insert_product(&mut self, product: &Product) -> Result<Product, DomainError> {
        if !self.receptions.iter().any(|r| r.id == product.reception_id) {
            return Err(DomainError::internal(
                "insert on products violates foreign key products_reception_id_fkey",
            ));
        }
        self.products.push(product.clone());
        Ok(product.clone())
    }

    fn delete_last_product(&mut self, reception_id: Uuid) -> Option<Product> {
        // max_by_key keeps the last of equal keys, i.e. the latest insert
        let idx = self
            .products
            .iter()
            .enumerate()
            .filter(|(_, p)| p.reception_id == reception_id)
            .max_by_key(|(_, p)| p.date_time)
            .map(|(idx, _)| idx)?;
        Some(self.products.remove(idx))
    }

    fn insert_user(&mut self, user: &User) -> Result<User, DomainError> {
        if self.users.iter().any(|u| u.email == user.email) {
            return Err(DomainError::already_exists("User", &user.email));
        }
        self.users.push(user.clone());
        Ok(user.clone())
    }
}

#[derive(Debug, Default)]
struct Faults {
    fail_audit: AtomicBool,
}

/// In-memory implementation of the Store port
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    faults: Arc<Faults>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every audit write fail until switched off again
    pub fn fail_audit_writes(&self, fail: bool) {
        self.faults.fail_audit.store(fail, Ordering::SeqCst);
    }
}

enum Handle {
    Auto(Arc<Mutex<Tables>>),
    Tx {
        live: OwnedMutexGuard<Tables>,
        staged: Tables,
    },
}

/// Connection handle of the in-memory store
pub struct MemoryConn {
    handle: Handle,
    faults: Arc<Faults>,
}

impl MemoryConn {
    async fn with<R, F>(&mut self, f: F) -> R
    where
        F: FnOnce(&mut Tables) -> R + Send,
        R: Send,
    {
        match &mut self.handle {
            Handle::Auto(tables) => {
                let mut guard = tables.lock().await;
                f(&mut guard)
            }
            Handle::Tx { staged, .. } => f(staged),
        }
    }
}

#[async_trait]
impl Store for MemoryStore {
    type Conn = MemoryConn;

    async fn connect(&self) -> Result<MemoryConn, DomainError> {
        Ok(MemoryConn {
            handle: Handle::Auto(self.tables.clone()),
            faults: self.faults.clone(),
        })
    }

    async fn begin(&self) -> Result<MemoryConn, DomainError> {
        let live = self.tables.clone().lock_owned().await;
        let staged = live.clone();
        Ok(MemoryConn {
            handle: Handle::Tx { live, staged },
            faults: self.faults.clone(),
        })
    }
}

#[async_trait]
impl UnitOfWork for MemoryConn {
    async fn commit(self) -> Result<(), DomainError> {
        if let Handle::Tx { mut live, staged } = self.handle {
            *live = staged;
        }
        Ok(())
    }

    async fn rollback(self) -> Result<(), DomainError> {
        Ok(())
    }
}

#[async_trait]
impl PvzRepository for MemoryConn {
    async fn find_pvz(&mut self, id: Uuid) -> Result<Option<Pvz>, DomainError> {
        Ok(self
            .with(|t| t.pvz.iter().find(|p| p.id == id).cloned())
            .await)
    }

    async fn find_pvz_by_city(&mut self, city: &str) -> Result<Option<Pvz>, DomainError> {
        Ok(self
            .with(|t| t.pvz.iter().find(|p| p.city == city).cloned())
            .await)
    }

    async fn find_all_pvz(&mut self) -> Result<Vec<Pvz>, DomainError> {
        Ok(self.with(|t| t.pvz_newest_first()).await)
    }

    async fn list_pvz(&mut self, offset: i64, limit: i64) -> Result<Vec<Pvz>, DomainError> {
        Ok(self
            .with(|t| window(t.pvz_newest_first(), offset, limit))
            .await)
    }

    async fn insert_pvz(&mut self, pvz: &Pvz) -> Result<Pvz, DomainError> {
        self.with(|t| t.insert_pvz(pvz)).await
    }

    async fn update_pvz(&mut self, pvz: &Pvz) -> Result<Option<Pvz>, DomainError> {
        self.with(|t| t.update_pvz(pvz)).await
    }

    async fn delete_pvz(&mut self, id: Uuid) -> Result<bool, DomainError> {
        Ok(self.with(|t| t.delete_pvz(id)).await)
    }

    async fn list_pvz_with_receptions(
        &mut self,
        filter: &PvzReceptionFilter,
    ) -> Result<Vec<PvzWithReceptions>, DomainError> {
        Ok(self.with(|t| t.pvz_with_receptions(filter)).await)
    }
}

#[async_trait]
impl ReceptionRepository for MemoryConn {
    async fn find_reception(&mut self, id: Uuid) -> Result<Option<Reception>, DomainError> {
        Ok(self
            .with(|t| t.receptions.iter().find(|r| r.id == id).cloned())
            .await)
    }

    async fn lock_reception(&mut self, id: Uuid) -> Result<Option<Reception>, DomainError> {
        self.find_reception(id).await
    }

    async fn find_open_reception(
        &mut self,
        pvz_id: Uuid,
    ) -> Result<Option<Reception>, DomainError> {
        Ok(self
            .with(|t| {
                t.receptions
                    .iter()
                    .find(|r| r.pvz_id == pvz_id && r.is_open())
                    .cloned()
            })
            .await)
    }

    async fn find_latest_reception(
        &mut self,
        pvz_id: Uuid,
    ) -> Result<Option<Reception>, DomainError> {
        Ok(self
            .with(|t| {
                t.receptions
                    .iter()
                    .filter(|r| r.pvz_id == pvz_id)
                    .max_by_key(|r| r.date_time)
                    .cloned()
            })
            .await)
    }

    async fn list_receptions(
        &mut self,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Reception>, DomainError> {
        Ok(self
            .with(|t| {
                let mut all = t.receptions.clone();
                all.reverse();
                all.sort_by(|a, b| b.date_time.cmp(&a.date_time));
                window(all, offset, limit)
            })
            .await)
    }

    async fn insert_reception(&mut self, reception: &Reception) -> Result<Reception, DomainError> {
        self.with(|t| t.insert_reception(reception)).await
    }

    async fn close_reception(&mut self, id: Uuid) -> Result<Option<Reception>, DomainError> {
        Ok(self.with(|t| t.close_reception(id)).await)
    }
}

#[async_trait]
impl ProductRepository for MemoryConn {
    async fn find_product(&mut self, id: Uuid) -> Result<Option<Product>, DomainError> {
        Ok(self
            .with(|t| t.products.iter().find(|p| p.id == id).cloned())
            .await)
    }

    async fn find_products_by_reception(
        &mut self,
        reception_id: Uuid,
    ) -> Result<Vec<Product>, DomainError> {
        Ok(self
            .with(|t| {
                t.products
                    .iter()
                    .filter(|p| p.reception_id == reception_id)
                    .cloned()
                    .collect()
            })
            .await)
    }

    async fn list_products(
        &mut self,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Product>, DomainError> {
        Ok(self
            .with(|t| {
                let mut all = t.products.clone();
                all.reverse();
                all.sort_by(|a, b| b.date_time.cmp(&a.date_time));
                window(all, offset, limit)
            })
            .await)
    }

    async fn insert_product(&mut self, product: &Product) -> Result<Product, DomainError> {
        self.with(|t| t.insert_product(product)).await
    }

    async fn delete_last_product(
        &mut self,
        reception_id: Uuid,
    ) -> Result<Option<Product>, DomainError> {
        Ok(self.with(|t| t.delete_last_product(reception_id)).await)
    }
}

#[async_trait]
impl UserRepository for MemoryConn {
    async fn find_user(&mut self, id: Uuid) -> Result<Option<User>, DomainError> {
        Ok(self
            .with(|t| t.users.iter().find(|u| u.id == id).cloned())
            .await)
    }

    async fn find_user_by_email(&mut self, email: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .with(|t| t.users.iter().find(|u| u.email == email).cloned())
            .await)
    }

    async fn insert_user(&mut self, user: &User) -> Result<User, DomainError> {
        self.with(|t| t.insert_user(user)).await
    }
}

#[async_trait]
impl AuditLogRepository for MemoryConn {
    async fn append_audit_entry(
        &mut self,
        entry: &AuditLogEntry,
    ) -> Result<AuditLogEntry, DomainError> {
        if self.faults.fail_audit.load(Ordering::SeqCst) {
            return Err(DomainError::internal("audit_log insert failed"));
        }
        let stored = self
            .with(|t| {
                t.audit.push(entry.clone());
                entry.clone()
            })
            .await;
        Ok(stored)
    }

    async fn find_audit_entries(
        &mut self,
        pvz_id: Uuid,
    ) -> Result<Vec<AuditLogEntry>, DomainError> {
        Ok(self
            .with(|t| {
                t.audit
                    .iter()
                    .filter(|e| e.pvz_id == pvz_id)
                    .cloned()
                    .collect()
            })
            .await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded() -> (MemoryStore, Pvz) {
        let store = MemoryStore::new();
        let pvz = store
            .connect()
            .await
            .unwrap()
            .insert_pvz(&Pvz::new("Москва".to_string()))
            .await
            .unwrap();
        (store, pvz)
    }

    #[tokio::test]
    async fn test_second_open_insert_is_already_open() {
        let (store, pvz) = seeded().await;
        let mut conn = store.begin().await.unwrap();

        conn.insert_reception(&Reception::new(pvz.id))
            .await
            .unwrap();
        let err = conn
            .insert_reception(&Reception::new(pvz.id))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::AlreadyOpen { pvz_id } if pvz_id == pvz.id));
    }

    #[tokio::test]
    async fn test_close_of_closed_reception_matches_nothing() {
        let (store, pvz) = seeded().await;
        let mut conn = store.connect().await.unwrap();
        let reception = conn
            .insert_reception(&Reception::new(pvz.id))
            .await
            .unwrap();

        let closed = conn.close_reception(reception.id).await.unwrap().unwrap();
        assert_eq!(closed.status, ReceptionStatus::Closed);
        assert!(conn.close_reception(reception.id).await.unwrap().is_none());
        assert!(conn.close_reception(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reception_for_deleted_pvz_is_not_found() {
        let (store, pvz) = seeded().await;
        let mut conn = store.connect().await.unwrap();
        assert!(conn.delete_pvz(pvz.id).await.unwrap());

        let err = conn
            .insert_reception(&Reception::new(pvz.id))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "Pvz", .. }));
    }

    #[tokio::test]
    async fn test_uncommitted_writes_are_discarded() {
        let (store, pvz) = seeded().await;
        {
            let mut tx = store.begin().await.unwrap();
            tx.insert_reception(&Reception::new(pvz.id))
                .await
                .unwrap();
        }

        let mut conn = store.connect().await.unwrap();
        assert!(conn.find_open_reception(pvz.id).await.unwrap().is_none());
    }
}
