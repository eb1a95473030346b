//! Shared fixtures for service tests

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use pvz::{CityPolicy, Pvz, Role, Store, User, UserRepository};

use super::{ProductService, PvzService, ReceptionService, TransactionCoordinator, UserService};
use crate::adapters::memory::MemoryStore;
use crate::cache::EntityCaches;

pub(crate) const TEST_MAX_PAGE_LIMIT: i64 = 30;

/// Route `tracing` output through the test harness
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

pub(crate) struct Fixture {
    pub store: Arc<MemoryStore>,
    pub shutdown: CancellationToken,
    pub caches: EntityCaches,
    pub pvz: PvzService<MemoryStore>,
    pub receptions: ReceptionService<MemoryStore>,
    pub products: ProductService<MemoryStore>,
    pub users: UserService<MemoryStore>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_cities(CityPolicy::free_form())
    }

    pub fn with_cities(cities: CityPolicy) -> Self {
        init_tracing();

        let store = Arc::new(MemoryStore::new());
        let shutdown = CancellationToken::new();
        let tx = TransactionCoordinator::new(store.clone(), shutdown.clone());
        let cache = EntityCaches::new(100);

        Self {
            pvz: PvzService::new(tx.clone(), cache.clone(), cities, TEST_MAX_PAGE_LIMIT),
            receptions: ReceptionService::new(tx.clone(), cache.clone()),
            products: ProductService::new(tx.clone(), cache.clone()),
            users: UserService::new(tx),
            caches: cache,
            store,
            shutdown,
        }
    }
}

/// Insert a user directly, bypassing password hashing
pub(crate) async fn seed_user(store: &MemoryStore, role: Role) -> User {
    let user = User::new(
        format!("{}-{}@pvz.test", role, uuid::Uuid::new_v4()),
        String::new(),
        role,
    );
    store
        .connect()
        .await
        .unwrap()
        .insert_user(&user)
        .await
        .unwrap()
}

/// A PVZ created through the service by a fresh admin
pub(crate) async fn seed_pvz(fx: &Fixture, city: &str) -> Pvz {
    let admin = seed_user(&fx.store, Role::Admin).await;
    fx.pvz.create(city, admin.id).await.unwrap()
}
