//! Transaction Coordinator
//!
//! Runs a unit of work inside one database transaction. The work receives the
//! transaction handle explicitly; every repository call it makes goes through
//! that handle, so partial writes are never visible to other connections.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio_util::sync::CancellationToken;

use pvz::{DomainError, Store, UnitOfWork};

/// Commits or rolls back a unit of work as a whole
pub struct TransactionCoordinator<S: Store> {
    store: Arc<S>,
    shutdown: CancellationToken,
}

impl<S: Store> Clone for TransactionCoordinator<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            shutdown: self.shutdown.clone(),
        }
    }
}

impl<S: Store> TransactionCoordinator<S> {
    pub fn new(store: Arc<S>, shutdown: CancellationToken) -> Self {
        Self { store, shutdown }
    }

    /// A non-transactional handle for read-only work. Still served after
    /// shutdown so in-flight reads can finish.
    pub async fn connect(&self) -> Result<S::Conn, DomainError> {
        self.store.connect().await
    }

    /// Run `work` in a transaction.
    ///
    /// Commits when `work` returns `Ok`. Rolls back when it returns `Err`, when
    /// it panics (the panic is resumed after the rollback), and when the
    /// shutdown token fires first (`DomainError::Cancelled`). Must not be called
    /// from inside another unit of work.
    pub async fn run<T, F>(&self, work: F) -> Result<T, DomainError>
    where
        T: Send,
        F: for<'t> FnOnce(&'t mut S::Conn) -> BoxFuture<'t, Result<T, DomainError>> + Send,
    {
        if self.shutdown.is_cancelled() {
            return Err(DomainError::Cancelled);
        }

        let mut tx = self.store.begin().await?;

        let outcome = tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => None,
            result = AssertUnwindSafe(work(&mut tx)).catch_unwind() => Some(result),
        };

        match outcome {
            Some(Ok(Ok(value))) => {
                tx.commit().await?;
                Ok(value)
            }
            Some(Ok(Err(err))) => {
                Self::rollback(tx, &err).await;
                Err(err)
            }
            Some(Err(panic)) => {
                Self::rollback(tx, &DomainError::internal("unit of work panicked")).await;
                std::panic::resume_unwind(panic)
            }
            None => {
                Self::rollback(tx, &DomainError::Cancelled).await;
                Err(DomainError::Cancelled)
            }
        }
    }

    async fn rollback(tx: S::Conn, cause: &DomainError) {
        if let Err(e) = tx.rollback().await {
            tracing::warn!("Rollback after '{}' failed: {}", cause, e);
        }
    }
}
