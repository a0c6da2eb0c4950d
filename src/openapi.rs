//! OpenAPI document for the product API.

use crate::error::{ErrorBody, ValidationErrorBody};
use crate::handlers::product;
use crate::model::{CreateProductRequest, Product, ReplaceProductRequest};
use crate::service::validation::{ErrorType, FieldError, Location};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "REST API Rust / Axum",
        description = "API Docs for Products"
    ),
    paths(
        product::get_products,
        product::get_product_by_id,
        product::create_product,
        product::update_product,
        product::update_availability,
        product::delete_product,
    ),
    components(schemas(
        Product,
        CreateProductRequest,
        ReplaceProductRequest,
        FieldError,
        ErrorType,
        Location,
        ValidationErrorBody,
        ErrorBody,
    )),
    tags(
        (name = "Products", description = "API operations related to products")
    )
)]
pub struct ProductsApi;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_product_route() {
        let doc = ProductsApi::openapi();
        let paths = &doc.paths.paths;
        assert!(paths.contains_key("/api/products"));
        assert!(paths.contains_key("/api/products/{id}"));
        let item = &paths["/api/products/{id}"];
        assert!(item.get.is_some());
        assert!(item.put.is_some());
        assert!(item.patch.is_some());
        assert!(item.delete.is_some());
    }

    #[test]
    fn serializes_to_json() {
        let json = ProductsApi::openapi().to_json().unwrap();
        assert!(json.contains("\"Products\""));
    }
}
