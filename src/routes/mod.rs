//! Route tables.

mod common;
mod docs;
mod products;

pub use common::common_routes;
pub use docs::{docs_routes, DOCS_PATH, OPENAPI_PATH};
pub use products::product_routes;
