//! Product Application Service (Use Case)
//!
//! Records scanned products into the open reception and undoes the latest scan.
//! Every write locks the reception row first, so a concurrent close cannot
//! slip between the status check and the insert or delete.

use uuid::Uuid;

use pvz::{
    DomainError, Product, ProductRepository, ProductType, PvzRepository, Reception,
    ReceptionRepository, Store,
};

use super::check_window;
use super::transaction::TransactionCoordinator;
use crate::cache::EntityCaches;

/// Lock a reception and require it to be in progress
async fn lock_open_reception<C>(conn: &mut C, reception_id: Uuid) -> Result<Reception, DomainError>
where
    C: ReceptionRepository + ?Sized,
{
    let reception = conn
        .lock_reception(reception_id)
        .await?
        .ok_or_else(|| DomainError::not_found("Reception", reception_id))?;

    if !reception.is_open() {
        return Err(DomainError::AlreadyClosed { reception_id });
    }
    Ok(reception)
}

/// The open reception of a PVZ, or NotFound naming what is missing
async fn open_reception_of<C>(conn: &mut C, pvz_id: Uuid) -> Result<Reception, DomainError>
where
    C: ReceptionRepository + PvzRepository + ?Sized,
{
    if let Some(reception) = conn.find_open_reception(pvz_id).await? {
        return Ok(reception);
    }
    conn.find_pvz(pvz_id)
        .await?
        .ok_or_else(|| DomainError::not_found("Pvz", pvz_id))?;
    Err(DomainError::not_found("open Reception of PVZ", pvz_id))
}

fn parse_types(raw: &[String]) -> Result<Vec<ProductType>, DomainError> {
    raw.iter()
        .map(|t| {
            t.parse::<ProductType>()
                .map_err(|e| DomainError::invalid("type", e.to_string()))
        })
        .collect()
}

/// Application service for Product operations
pub struct ProductService<S: Store> {
    tx: TransactionCoordinator<S>,
    cache: EntityCaches,
}

impl<S: Store> ProductService<S> {
    pub fn new(tx: TransactionCoordinator<S>, cache: EntityCaches) -> Self {
        Self { tx, cache }
    }

    /// Add one product to an open reception
    pub async fn create(
        &self,
        reception_id: Uuid,
        product_type: &str,
    ) -> Result<Product, DomainError> {
        let mut created = self
            .create_batch(reception_id, vec![product_type.to_string()])
            .await?;
        created
            .pop()
            .ok_or_else(|| DomainError::internal("product insert returned no rows"))
    }

    /// Add several products to an open reception; all or none are stored
    pub async fn create_batch(
        &self,
        reception_id: Uuid,
        types: Vec<String>,
    ) -> Result<Vec<Product>, DomainError> {
        if types.is_empty() {
            return Err(DomainError::invalid(
                "types",
                "at least one product type is required",
            ));
        }

        let created = self
            .tx
            .run(move |conn| {
                Box::pin(async move {
                    let reception = lock_open_reception(conn, reception_id).await?;
                    let parsed = parse_types(&types)?;

                    let mut created = Vec::with_capacity(parsed.len());
                    for product_type in parsed {
                        created.push(
                            conn.insert_product(&Product::new(reception.id, product_type))
                                .await?,
                        );
                    }
                    Ok(created)
                })
            })
            .await?;

        tracing::info!(
            "Added {} product(s) to reception {}",
            created.len(),
            reception_id
        );

        Ok(created)
    }

    /// Add one product to whatever reception is open at a PVZ
    pub async fn create_for_pvz(
        &self,
        pvz_id: Uuid,
        product_type: &str,
    ) -> Result<Product, DomainError> {
        let raw = product_type.to_string();

        let product = self
            .tx
            .run(move |conn| {
                Box::pin(async move {
                    let open = open_reception_of(conn, pvz_id).await?;
                    let reception = lock_open_reception(conn, open.id).await?;
                    let product_type = parse_types(std::slice::from_ref(&raw))?
                        .pop()
                        .ok_or_else(|| DomainError::invalid("type", "missing"))?;
                    conn.insert_product(&Product::new(reception.id, product_type))
                        .await
                })
            })
            .await?;

        tracing::info!(
            "Added product {} to reception {} at PVZ {}",
            product.id,
            product.reception_id,
            pvz_id
        );

        Ok(product)
    }

    /// Remove the most recently scanned product of an open reception
    pub async fn delete_last(&self, reception_id: Uuid) -> Result<Product, DomainError> {
        let deleted = self
            .tx
            .run(move |conn| {
                Box::pin(async move {
                    lock_open_reception(conn, reception_id).await?;
                    conn.delete_last_product(reception_id)
                        .await?
                        .ok_or_else(|| {
                            DomainError::not_found("Product in reception", reception_id)
                        })
                })
            })
            .await?;

        self.cache.products.invalidate(&deleted.id).await;
        tracing::info!(
            "Removed product {} from reception {}",
            deleted.id,
            reception_id
        );

        Ok(deleted)
    }

    /// Remove the most recently scanned product of the reception open at a PVZ
    pub async fn delete_last_for_pvz(&self, pvz_id: Uuid) -> Result<Product, DomainError> {
        let deleted = self
            .tx
            .run(move |conn| {
                Box::pin(async move {
                    let open = open_reception_of(conn, pvz_id).await?;
                    lock_open_reception(conn, open.id).await?;
                    conn.delete_last_product(open.id)
                        .await?
                        .ok_or_else(|| DomainError::not_found("Product in reception", open.id))
                })
            })
            .await?;

        self.cache.products.invalidate(&deleted.id).await;
        tracing::info!(
            "Removed product {} from reception {} at PVZ {}",
            deleted.id,
            deleted.reception_id,
            pvz_id
        );

        Ok(deleted)
    }

    /// Get a Product by ID
    pub async fn get_by_id(&self, id: Uuid) -> Result<Product, DomainError> {
        if let Some(product) = self.cache.products.get(&id).await {
            return Ok(product);
        }

        let seen = self.cache.products.generation();
        let product = self
            .tx
            .connect()
            .await?
            .find_product(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Product", id))?;

        self.cache
            .products
            .insert(id, product.clone(), seen)
            .await;
        Ok(product)
    }

    /// Products of a reception in scan order
    pub async fn get_by_reception_id(
        &self,
        reception_id: Uuid,
    ) -> Result<Vec<Product>, DomainError> {
        let mut conn = self.tx.connect().await?;
        conn.find_reception(reception_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Reception", reception_id))?;
        conn.find_products_by_reception(reception_id).await
    }

    /// List a window of products, newest first
    pub async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Product>, DomainError> {
        check_window(offset, limit)?;
        self.tx.connect().await?.list_products(offset, limit).await
    }
}
