//! In-process product store. Serves `STORE_BACKEND=memory` and the test suite.

use super::ProductStore;
use crate::error::StoreError;
use crate::model::{Product, ProductFields, ProductId};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug)]
struct Table {
    rows: BTreeMap<ProductId, Product>,
    next_id: ProductId,
}

impl Default for Table {
    fn default() -> Self {
        Table {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryProductStore {
    table: RwLock<Table>,
}

impl MemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Table>, StoreError> {
        self.table
            .read()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Table>, StoreError> {
        self.table
            .write()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".into()))
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn authenticate(&self) -> Result<(), StoreError> {
        self.read().map(|_| ())
    }

    async fn sync_schema(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn reset(&self) -> Result<(), StoreError> {
        *self.write()? = Table::default();
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        Ok(self.read()?.rows.values().rev().cloned().collect())
    }

    async fn get(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        Ok(self.read()?.rows.get(&id).cloned())
    }

    async fn insert(&self, fields: &ProductFields) -> Result<Product, StoreError> {
        let mut table = self.write()?;
        let id = table.next_id;
        let next_id = id
            .checked_add(1)
            .ok_or_else(|| StoreError::Unavailable("product id sequence exhausted".into()))?;
        let now = Utc::now();
        let product = Product {
            id,
            name: fields.name.clone(),
            price: fields.price,
            availability: fields.availability,
            created_at: now,
            updated_at: now,
        };
        table.next_id = next_id;
        table.rows.insert(product.id, product.clone());
        Ok(product)
    }

    async fn replace(
        &self,
        id: ProductId,
        fields: &ProductFields,
    ) -> Result<Option<Product>, StoreError> {
        let mut table = self.write()?;
        Ok(table.rows.get_mut(&id).map(|product| {
            product.name = fields.name.clone();
            product.price = fields.price;
            product.availability = fields.availability;
            product.updated_at = Utc::now();
            product.clone()
        }))
    }

    async fn patch_availability(
        &self,
        id: ProductId,
        availability: bool,
    ) -> Result<Option<Product>, StoreError> {
        let mut table = self.write()?;
        Ok(table.rows.get_mut(&id).map(|product| {
            product.availability = availability;
            product.updated_at = Utc::now();
            product.clone()
        }))
    }

    async fn delete(&self, id: ProductId) -> Result<bool, StoreError> {
        Ok(self.write()?.rows.remove(&id).is_some())
    }

    async fn close(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(name: &str, price: f64) -> ProductFields {
        ProductFields {
            name: name.into(),
            price,
            availability: true,
        }
    }

    #[tokio::test]
    async fn ids_start_at_one_and_list_is_descending() {
        let store = MemoryProductStore::new();
        let a = store.insert(&fields("Mouse", 50.0)).await.unwrap();
        let b = store.insert(&fields("Teclado", 80.0)).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));
        let ids: Vec<_> = store.list().await.unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let store = MemoryProductStore::new();
        let a = store.insert(&fields("Mouse", 50.0)).await.unwrap();
        assert!(store.delete(a.id).await.unwrap());
        let b = store.insert(&fields("Teclado", 80.0)).await.unwrap();
        assert_eq!(b.id, 2);
    }

    #[tokio::test]
    async fn replace_keeps_id_and_creation_time() {
        let store = MemoryProductStore::new();
        let a = store.insert(&fields("Mouse", 50.0)).await.unwrap();
        let replaced = store
            .replace(
                a.id,
                &ProductFields {
                    name: "Monitor".into(),
                    price: 300.0,
                    availability: false,
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(replaced.id, a.id);
        assert_eq!(replaced.created_at, a.created_at);
        assert!(replaced.updated_at >= a.updated_at);
        assert!(!replaced.availability);
    }

    #[tokio::test]
    async fn missing_rows_are_reported_not_created() {
        let store = MemoryProductStore::new();
        assert!(store.get(7).await.unwrap().is_none());
        assert!(store.patch_availability(7, false).await.unwrap().is_none());
        assert!(store.replace(7, &fields("Mouse", 1.0)).await.unwrap().is_none());
        assert!(!store.delete(7).await.unwrap());
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn reset_clears_rows_and_restarts_ids() {
        let store = MemoryProductStore::new();
        store.insert(&fields("Mouse", 50.0)).await.unwrap();
        store.insert(&fields("Teclado", 80.0)).await.unwrap();
        store.reset().await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
        assert_eq!(store.insert(&fields("Monitor", 300.0)).await.unwrap().id, 1);
    }

    #[tokio::test]
    async fn exhausted_id_sequence_is_an_error() {
        let store = MemoryProductStore::new();
        store.table.write().unwrap().next_id = ProductId::MAX;
        let last = store.insert(&fields("Mouse", 50.0)).await;
        assert!(matches!(last, Err(StoreError::Unavailable(_))));
        assert!(store.list().await.unwrap().is_empty());
    }
}
