//! Products API server binary.
//!
//! `products-api` (or `products-api serve`) starts the HTTP server;
//! `products-api clear` drops and recreates the products table.

use clap::{Parser, Subcommand};
use products_api::{app, connect_db, store, AppState, Settings};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "products-api", about = "REST API for managing products", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start the HTTP server (default).
    Serve,
    /// Delete every product and reset ids.
    Clear,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("products_api=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();
    let settings = Settings::from_env()?;
    let store = store::from_settings(&settings)?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Clear => {
            store.reset().await?;
            tracing::info!("Datos eliminados correctamente");
            store.close().await;
            Ok(())
        }
        Command::Serve => {
            connect_db(store.as_ref()).await;

            let router = app(AppState::new(store.clone()), &settings);
            let listener = TcpListener::bind(settings.socket_addr()).await?;
            tracing::info!("Rest API en el puerto {}", listener.local_addr()?.port());
            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            store.close().await;
            Ok(())
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
