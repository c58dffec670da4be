//! Payments Service - Main Application Entry Point
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Create database connection pool
//! 3. Run database migrations
//! 4. Connect to the warehouse (one retry after a fixed delay; never fatal)
//! 5. Build HTTP router and start serving
//! 6. On Ctrl-C or SIGTERM, stop accepting requests, then close the warehouse channel

use std::sync::Arc;

use payments_service::{
    build_state, config::Config, db, router, shutdown_signal, warehouse::Connector,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Reads RUST_LOG (defaults to "info")
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;
    tracing::info!("Configuration loaded");

    let pool = db::create_pool(&config.database_url()?).await?;
    tracing::info!("Database pool created");

    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations complete");

    let connector = Arc::new(Connector::new(
        config.warehouse_addr(),
        config.warehouse_rpc_timeout(),
    ));
    // Blocks startup for at most one retry delay
    if !connector
        .connect_with_retry(config.warehouse_retry_delay())
        .await
    {
        tracing::warn!(addr = %connector.addr(), "Starting without a warehouse channel");
    }

    let app = router(build_state(pool, connector.clone()));

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    connector.shutdown().await;
    Ok(())
}
