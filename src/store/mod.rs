//! Persistence for products behind a swappable repository interface.
//!
//! Statements are auto-committed one at a time. Handlers check existence
//! before mutating, so a row removed between the check and the write shows up
//! here as `Ok(None)` / `Ok(false)`.

mod memory;
mod postgres;

pub use memory::MemoryProductStore;
pub use postgres::PgProductStore;

use crate::config::{Settings, StoreBackend};
use crate::error::StoreError;
use crate::model::{Product, ProductFields, ProductId};
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use std::sync::Arc;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Connectivity check run once at startup and by the readiness probe.
    async fn authenticate(&self) -> Result<(), StoreError>;

    /// Create the products table if it does not exist yet.
    async fn sync_schema(&self) -> Result<(), StoreError>;

    /// Drop every product and restart ids at 1.
    async fn reset(&self) -> Result<(), StoreError>;

    /// All products, highest id first.
    async fn list(&self) -> Result<Vec<Product>, StoreError>;

    async fn get(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    async fn insert(&self, fields: &ProductFields) -> Result<Product, StoreError>;

    /// Overwrite every mutable field.
    async fn replace(
        &self,
        id: ProductId,
        fields: &ProductFields,
    ) -> Result<Option<Product>, StoreError>;

    async fn patch_availability(
        &self,
        id: ProductId,
        availability: bool,
    ) -> Result<Option<Product>, StoreError>;

    /// Hard delete. Returns whether a row was removed.
    async fn delete(&self, id: ProductId) -> Result<bool, StoreError>;

    async fn close(&self);
}

/// Build the store selected by `settings`. The Postgres pool connects lazily,
/// so this only fails on a malformed connection string.
pub fn from_settings(settings: &Settings) -> Result<Arc<dyn ProductStore>, StoreError> {
    Ok(match settings.store_backend {
        StoreBackend::Postgres => Arc::new(PgProductStore::connect(
            &settings.database_url,
            settings.db_max_connections,
        )?),
        StoreBackend::Memory => Arc::new(MemoryProductStore::new()),
    })
}
