//! Shared state handed to every handler.

use std::sync::Arc;

use axum::extract::FromRef;

use crate::{db::DbPool, services::order_relay::OrderRelay, warehouse::WarehouseGateway};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub relay: Arc<OrderRelay>,
    pub warehouse: Arc<dyn WarehouseGateway>,
}

impl FromRef<AppState> for DbPool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Arc<OrderRelay> {
    fn from_ref(state: &AppState) -> Self {
        state.relay.clone()
    }
}
