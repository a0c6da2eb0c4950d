//! Product routes: each id-scoped route validates `:id` before its handler runs.

use crate::handlers::product::{
    create_product, delete_product, get_product_by_id, get_products, update_availability,
    update_product,
};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn product_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(get_products).post(create_product))
        .route(
            "/:id",
            get(get_product_by_id)
                .put(update_product)
                .patch(update_availability)
                .delete(delete_product),
        )
        .with_state(state)
}
