//! Product handlers. Input reaching these functions already passed the
//! validation gate; id-scoped operations check existence before touching
//! the row.

use crate::error::{AppError, ErrorBody, ValidationErrorBody};
use crate::extractors::{NewProduct, ReplaceProduct, ValidId};
use crate::model::{CreateProductRequest, Product, ReplaceProductRequest};
use crate::response::{success_created, success_ok, Data};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse};

pub const DELETED_MESSAGE: &str = "Producto Eliminado";

/// List every product, newest id first.
#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Products",
    responses(
        (status = 200, description = "Successful response", body = Data<Vec<Product>>),
    )
)]
pub async fn get_products(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let products = state.store.list().await?;
    Ok(success_ok(products))
}

/// Get a product by id.
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = i32, Path, description = "The ID of the product to retrieve")),
    responses(
        (status = 200, description = "Successful response", body = Data<Product>),
        (status = 400, description = "Bad request - Invalid ID", body = ValidationErrorBody),
        (status = 404, description = "Not found", body = ErrorBody),
    )
)]
pub async fn get_product_by_id(
    State(state): State<AppState>,
    ValidId(id): ValidId,
) -> Result<impl IntoResponse, AppError> {
    let product = state.store.get(id).await?.ok_or(AppError::NotFound)?;
    Ok(success_ok(product))
}

/// Create a product. New products are always available.
#[utoipa::path(
    post,
    path = "/api/products",
    tag = "Products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created successfully", body = Data<Product>),
        (status = 400, description = "Bad request - Invalid input data", body = ValidationErrorBody),
    )
)]
pub async fn create_product(
    State(state): State<AppState>,
    NewProduct(fields): NewProduct,
) -> Result<impl IntoResponse, AppError> {
    let product = state.store.insert(&fields).await?;
    tracing::info!(id = product.id, "product created");
    Ok(success_created(product))
}

/// Replace every mutable field of a product.
#[utoipa::path(
    put,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = i32, Path, description = "The ID of the product to update")),
    request_body = ReplaceProductRequest,
    responses(
        (status = 200, description = "Successful response", body = Data<Product>),
        (status = 400, description = "Bad request - Invalid ID or invalid input data", body = ValidationErrorBody),
        (status = 404, description = "Product not found", body = ErrorBody),
    )
)]
pub async fn update_product(
    State(state): State<AppState>,
    ReplaceProduct { id, fields }: ReplaceProduct,
) -> Result<impl IntoResponse, AppError> {
    state.store.get(id).await?.ok_or(AppError::NotFound)?;
    let product = state
        .store
        .replace(id, &fields)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(success_ok(product))
}

/// Flip `availability`. Any request body is ignored.
#[utoipa::path(
    patch,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = i32, Path, description = "The ID of the product to update")),
    responses(
        (status = 200, description = "Successful response", body = Data<Product>),
        (status = 400, description = "Bad request - Invalid ID", body = ValidationErrorBody),
        (status = 404, description = "Product not found", body = ErrorBody),
    )
)]
pub async fn update_availability(
    State(state): State<AppState>,
    ValidId(id): ValidId,
) -> Result<impl IntoResponse, AppError> {
    let current = state.store.get(id).await?.ok_or(AppError::NotFound)?;
    let product = state
        .store
        .patch_availability(id, !current.availability)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(success_ok(product))
}

/// Permanently delete a product.
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = i32, Path, description = "The ID of the product to delete")),
    responses(
        (status = 200, description = "Successful response", body = Data<String>),
        (status = 400, description = "Bad request - Invalid ID", body = ValidationErrorBody),
        (status = 404, description = "Product not found", body = ErrorBody),
    )
)]
pub async fn delete_product(
    State(state): State<AppState>,
    ValidId(id): ValidId,
) -> Result<impl IntoResponse, AppError> {
    state.store.get(id).await?.ok_or(AppError::NotFound)?;
    if !state.store.delete(id).await? {
        return Err(AppError::NotFound);
    }
    tracing::info!(id, "product deleted");
    Ok(success_ok(DELETED_MESSAGE))
}
