//! The product entity and its validated write payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Surrogate key assigned by the store on insert (`SERIAL`).
pub type ProductId = i32;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
#[sqlx(rename_all = "camelCase")]
pub struct Product {
    #[schema(example = 1)]
    pub id: ProductId,
    #[schema(example = "Monitor Curvo de 49 Pulgadas")]
    pub name: String,
    #[schema(example = 300)]
    pub price: f64,
    #[schema(example = true)]
    pub availability: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Mutable fields of a product, built only from input that passed validation.
#[derive(Clone, Debug, PartialEq)]
pub struct ProductFields {
    pub name: String,
    pub price: f64,
    pub availability: bool,
}

/// Request body accepted by `POST /api/products`. Documentation only; the
/// handler reads the raw body so every rule can report independently.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    #[schema(example = "Monitor Curvo de 49 Pulgadas")]
    pub name: String,
    #[schema(example = 399)]
    pub price: f64,
}

/// Request body accepted by `PUT /api/products/{id}`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ReplaceProductRequest {
    #[schema(example = "Monitor Curvo de 49 Pulgadas")]
    pub name: String,
    #[schema(example = 399)]
    pub price: f64,
    #[schema(example = true)]
    pub availability: bool,
}
