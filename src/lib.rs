//! Products API: a CRUD REST service for products backed by PostgreSQL.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod migration;
pub mod model;
pub mod openapi;
pub mod response;
pub mod routes;
pub mod server;
pub mod service;
pub mod state;
pub mod store;

pub use config::{Settings, StoreBackend};
pub use error::{AppError, ConfigError, StoreError};
pub use model::{Product, ProductFields, ProductId};
pub use server::{app, connect_db, API_PREFIX};
pub use state::AppState;
pub use store::{MemoryProductStore, PgProductStore, ProductStore};
