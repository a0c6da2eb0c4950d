//! Interactive API documentation.

use crate::openapi::ProductsApi;
use axum::Router;
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

pub const DOCS_PATH: &str = "/docs";
pub const OPENAPI_PATH: &str = "/docs/openapi.json";

/// RapiDoc UI at `/docs`, raw OpenAPI document at `/docs/openapi.json`.
pub fn docs_routes() -> Router {
    Router::new()
        .merge(RapiDoc::with_openapi(OPENAPI_PATH, ProductsApi::openapi()).path(DOCS_PATH))
}
