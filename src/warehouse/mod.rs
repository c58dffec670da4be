//! Warehouse fulfillment service integration.
//!
//! - `protocol`: Thrift binary codec for `prepareOrder`
//! - `client`: one request/response channel over a buffered stream
//! - `connector`: the process-wide channel owner (startup retry, serialization, deadline)

pub mod client;
pub mod connector;
pub mod error;
pub mod protocol;

use async_trait::async_trait;

use crate::models::order::{OrderItem, WarehouseUserInfo};

pub use connector::Connector;
pub use error::{ProtocolError, RemoteFault, WarehouseError};

/// Outbound side of the order relay.
///
/// Implemented by [`Connector`]; tests substitute recording fakes.
#[async_trait]
pub trait WarehouseGateway: Send + Sync {
    /// Forward `prepareOrder(user, items)` to the warehouse.
    async fn prepare_order(
        &self,
        user: &WarehouseUserInfo,
        items: &[OrderItem],
    ) -> Result<(), WarehouseError>;

    /// Whether a live channel is currently held.
    async fn is_connected(&self) -> bool;
}
