//! Schema management for the products table.

use crate::error::StoreError;
use sqlx::PgPool;

pub const PRODUCTS_TABLE: &str = "products";

const CREATE_PRODUCTS: &str = r#"
CREATE TABLE IF NOT EXISTS products (
    id SERIAL PRIMARY KEY,
    name VARCHAR(100) NOT NULL,
    price DOUBLE PRECISION NOT NULL CHECK (price > 0),
    availability BOOLEAN NOT NULL DEFAULT TRUE,
    "createdAt" TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    "updatedAt" TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const DROP_PRODUCTS: &str = "DROP TABLE IF EXISTS products";

/// Create the products table when missing. Existing rows are untouched.
pub async fn apply_migrations(pool: &PgPool) -> Result<(), StoreError> {
    tracing::debug!(table = PRODUCTS_TABLE, "ensuring table exists");
    sqlx::query(CREATE_PRODUCTS).execute(pool).await?;
    Ok(())
}

/// Drop and recreate the products table, discarding all rows and resetting
/// the id sequence.
pub async fn recreate(pool: &PgPool) -> Result<(), StoreError> {
    tracing::debug!(table = PRODUCTS_TABLE, "recreating table");
    sqlx::query(DROP_PRODUCTS).execute(pool).await?;
    sqlx::query(CREATE_PRODUCTS).execute(pool).await?;
    Ok(())
}
