//! Product Repository Port
//!
//! Abstract interface for Product persistence operations.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{errors::DomainError, Product};

/// Repository interface for Product entities
#[async_trait]
pub trait ProductRepository: Send {
    /// Find a Product by ID
    async fn find_product(&mut self, id: Uuid) -> Result<Option<Product>, DomainError>;

    /// All Products of a Reception in scan order
    async fn find_products_by_reception(
        &mut self,
        reception_id: Uuid,
    ) -> Result<Vec<Product>, DomainError>;

    /// List a window of Products, newest first
    async fn list_products(&mut self, offset: i64, limit: i64)
        -> Result<Vec<Product>, DomainError>;

    /// Insert a new Product
    async fn insert_product(&mut self, product: &Product) -> Result<Product, DomainError>;

    /// Delete the most recently scanned Product of a Reception in one step.
    ///
    /// Ties on date_time are broken by insertion order.
    async fn delete_last_product(
        &mut self,
        reception_id: Uuid,
    ) -> Result<Option<Product>, DomainError>;
}
