//! Payments service.
//!
//! REST API over customer accounts and their transactions, plus the order
//! relay that forwards `POST /api/order` submissions to the warehouse
//! fulfillment service over Thrift.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx (async queries)
//! - **Warehouse**: Thrift binary protocol over one long-lived TCP channel
//! - **Format**: JSON requests/responses

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod state;
pub mod warehouse;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::{
    db::DbPool,
    services::{account_directory::PgAccountDirectory, order_relay::OrderRelay},
    state::AppState,
    warehouse::WarehouseGateway,
};

/// Wire the production state: accounts from PostgreSQL, orders to `warehouse`.
pub fn build_state(pool: DbPool, warehouse: Arc<dyn WarehouseGateway>) -> AppState {
    let directory = Arc::new(PgAccountDirectory::new(pool.clone()));
    let relay = Arc::new(OrderRelay::new(directory, warehouse.clone()));

    AppState {
        pool,
        relay,
        warehouse,
    }
}

/// Build the HTTP router with every route and the tracing layer.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        // Order relay
        .route("/api/order", post(handlers::orders::submit_order))
        // Accounts
        .route(
            "/api/accounts",
            get(handlers::accounts::list_accounts).post(handlers::accounts::create_account),
        )
        .route(
            "/api/accounts/{id}",
            get(handlers::accounts::get_account).delete(handlers::accounts::delete_account),
        )
        .route(
            "/api/accounts/{id}/transactions",
            get(handlers::accounts::list_account_transactions),
        )
        // Transactions
        .route(
            "/api/transactions",
            get(handlers::transactions::list_transactions)
                .post(handlers::transactions::create_transaction),
        )
        .route(
            "/api/transactions/{id}",
            get(handlers::transactions::get_transaction)
                .delete(handlers::transactions::delete_transaction),
        )
        .route(
            "/api/transactions/{id}/account",
            get(handlers::transactions::get_transaction_account),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Resolves on Ctrl-C or, on unix, SIGTERM.
///
/// Passed to `with_graceful_shutdown` so in-flight requests drain first.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
