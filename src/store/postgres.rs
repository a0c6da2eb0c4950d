//! PostgreSQL-backed product store.

use super::ProductStore;
use crate::error::StoreError;
use crate::migration;
use crate::model::{Product, ProductFields, ProductId};
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

const COLUMNS: &str = r#"id, name, price, availability, "createdAt", "updatedAt""#;

#[derive(Clone, Debug)]
pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    /// Build a lazily connecting pool; nothing touches the network until the
    /// first statement.
    pub fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect_lazy(database_url)?;
        Ok(PgProductStore { pool })
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn authenticate(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn sync_schema(&self) -> Result<(), StoreError> {
        migration::apply_migrations(&self.pool).await
    }

    async fn reset(&self) -> Result<(), StoreError> {
        migration::recreate(&self.pool).await
    }

    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM products ORDER BY id DESC");
        tracing::debug!(sql = %sql, "query");
        let rows = sqlx::query_as::<_, Product>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn get(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM products WHERE id = $1");
        tracing::debug!(sql = %sql, id, "query");
        let row = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert(&self, fields: &ProductFields) -> Result<Product, StoreError> {
        let sql = format!(
            "INSERT INTO products (name, price, availability) VALUES ($1, $2, $3) RETURNING {COLUMNS}"
        );
        tracing::debug!(sql = %sql, params = ?fields, "query");
        let row = sqlx::query_as::<_, Product>(&sql)
            .bind(&fields.name)
            .bind(fields.price)
            .bind(fields.availability)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn replace(
        &self,
        id: ProductId,
        fields: &ProductFields,
    ) -> Result<Option<Product>, StoreError> {
        let sql = format!(
            r#"UPDATE products SET name = $2, price = $3, availability = $4, "updatedAt" = NOW() WHERE id = $1 RETURNING {COLUMNS}"#
        );
        tracing::debug!(sql = %sql, id, params = ?fields, "query");
        let row = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .bind(&fields.name)
            .bind(fields.price)
            .bind(fields.availability)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn patch_availability(
        &self,
        id: ProductId,
        availability: bool,
    ) -> Result<Option<Product>, StoreError> {
        let sql = format!(
            r#"UPDATE products SET availability = $2, "updatedAt" = NOW() WHERE id = $1 RETURNING {COLUMNS}"#
        );
        tracing::debug!(sql = %sql, id, availability, "query");
        let row = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .bind(availability)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete(&self, id: ProductId) -> Result<bool, StoreError> {
        let sql = "DELETE FROM products WHERE id = $1";
        tracing::debug!(sql = %sql, id, "query");
        let result = sqlx::query(sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
