//! Application assembly and store startup.

use crate::config::Settings;
use crate::routes::{common_routes, docs_routes, product_routes};
use crate::state::AppState;
use crate::store::ProductStore;
use axum::http::{header, HeaderValue, Method};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub const API_PREFIX: &str = "/api/products";

/// Full router: `/api/products`, `/docs`, the operational routes, CORS and
/// per-request tracing.
pub fn app(state: AppState, settings: &Settings) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .nest(API_PREFIX, product_routes(state))
        .merge(docs_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(settings.frontend_url.as_deref())),
        )
}

/// Only `frontend_url` may make cross-origin calls; without it no origin is
/// allowed.
pub fn cors_layer(frontend_url: Option<&str>) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE]);
    match frontend_url.map(HeaderValue::from_str) {
        Some(Ok(origin)) => layer.allow_origin(origin),
        Some(Err(e)) => {
            tracing::warn!(error = %e, "FRONTEND_URL is not a valid origin; CORS disabled");
            layer
        }
        None => layer,
    }
}

/// Check connectivity and sync the schema. Failures are logged and
/// swallowed: the server keeps serving and requests fail individually until
/// the store comes back. Returns whether the store is ready.
pub async fn connect_db(store: &dyn ProductStore) -> bool {
    if let Err(e) = store.authenticate().await {
        tracing::error!(error = %e, "Hubo un error al conectar a la BD");
        return false;
    }
    if let Err(e) = store.sync_schema().await {
        tracing::error!(error = %e, "Hubo un error al sincronizar la BD");
        return false;
    }
    tracing::info!("database connection established");
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::store::MockProductStore;

    #[tokio::test]
    async fn connection_error_is_logged_not_fatal() {
        let mut store = MockProductStore::new();
        store
            .expect_authenticate()
            .once()
            .returning(|| Err(StoreError::Unavailable("Hubo un error al conectar a la BD".into())));
        store.expect_sync_schema().never();

        assert!(!connect_db(&store).await);
    }

    #[tokio::test]
    async fn schema_is_synced_after_authenticating() {
        let mut store = MockProductStore::new();
        let mut seq = mockall::Sequence::new();
        store
            .expect_authenticate()
            .once()
            .in_sequence(&mut seq)
            .returning(|| Ok(()));
        store
            .expect_sync_schema()
            .once()
            .in_sequence(&mut seq)
            .returning(|| Ok(()));

        assert!(connect_db(&store).await);
    }

    #[tokio::test]
    async fn sync_failure_reports_not_ready() {
        let mut store = MockProductStore::new();
        store.expect_authenticate().returning(|| Ok(()));
        store
            .expect_sync_schema()
            .returning(|| Err(StoreError::Unavailable("permission denied".into())));

        assert!(!connect_db(&store).await);
    }
}
