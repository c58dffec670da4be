//! Process-wide owner of the warehouse channel.
//!
//! # Lifecycle
//!
//! 1. Startup calls [`Connector::connect_with_retry`]: one attempt, a fixed
//!    delay, one more attempt. A second failure leaves the connector without a
//!    channel; the process keeps serving.
//! 2. Each `prepare_order` takes the channel lock, so calls never interleave
//!    on the wire. With no channel, a single immediate connect is attempted
//!    before giving up with `Unavailable`.
//! 3. A timeout or transport/protocol failure drops the channel, since the
//!    stream position is no longer known.
//! 4. [`Connector::shutdown`] closes the channel when the server stops.
//!
//! Channel presence is mirrored in an atomic flag so health checks never wait
//! behind an in-flight call.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::WarehouseGateway;
use super::client::WarehouseClient;
use super::error::WarehouseError;
use crate::models::order::{OrderItem, WarehouseUserInfo};

pub struct Connector {
    addr: String,
    rpc_timeout: Duration,
    channel: Mutex<Option<WarehouseClient>>,
    /// Set and cleared under the `channel` lock.
    connected: AtomicBool,
}

impl Connector {
    /// Create a connector for `addr` (`host:port`). No connection is opened yet.
    pub fn new(addr: impl Into<String>, rpc_timeout: Duration) -> Self {
        Self {
            addr: addr.into(),
            rpc_timeout,
            channel: Mutex::new(None),
            connected: AtomicBool::new(false),
        }
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Open the transport and bind a client to it, replacing any previous channel.
    pub async fn connect(&self) -> Result<(), WarehouseError> {
        let client = self.open().await?;
        let mut channel = self.channel.lock().await;
        *channel = Some(client);
        self.connected.store(true, Ordering::Release);
        drop(channel);
        tracing::info!(addr = %self.addr, "Connected to warehouse");
        Ok(())
    }

    async fn open(&self) -> Result<WarehouseClient, WarehouseError> {
        // Connecting shares the call deadline so an unroutable host cannot stall the lock.
        match tokio::time::timeout(self.rpc_timeout, WarehouseClient::connect(&self.addr)).await {
            Ok(result) => result,
            Err(_) => Err(WarehouseError::Connection(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                format!("connect to {} timed out", self.addr),
            ))),
        }
    }

    /// Startup sequence: connect, and on failure wait `delay` and try exactly once more.
    ///
    /// Returns whether a channel is live afterwards. Never fails the process.
    pub async fn connect_with_retry(&self, delay: Duration) -> bool {
        match self.connect().await {
            Ok(()) => return true,
            Err(err) => tracing::warn!(
                addr = %self.addr,
                error = %err,
                "Failed to connect to warehouse, retrying in {:?}",
                delay
            ),
        }

        tokio::time::sleep(delay).await;

        match self.connect().await {
            Ok(()) => true,
            Err(err) => {
                tracing::error!(
                    addr = %self.addr,
                    error = %err,
                    "Warehouse unreachable after retry, orders will fail until it comes back"
                );
                false
            }
        }
    }

    /// Close the channel if one is open.
    pub async fn shutdown(&self) {
        let mut channel = self.channel.lock().await;
        self.connected.store(false, Ordering::Release);
        if let Some(mut client) = channel.take() {
            if let Err(err) = client.shutdown().await {
                tracing::warn!(error = %err, "Error closing warehouse channel");
            }
            tracing::info!("Warehouse channel closed");
        }
    }
}

#[async_trait]
impl WarehouseGateway for Connector {
    async fn prepare_order(
        &self,
        user: &WarehouseUserInfo,
        items: &[OrderItem],
    ) -> Result<(), WarehouseError> {
        let mut channel = self.channel.lock().await;

        if channel.is_none() {
            match self.open().await {
                Ok(client) => {
                    tracing::info!(addr = %self.addr, "Reconnected to warehouse");
                    *channel = Some(client);
                    self.connected.store(true, Ordering::Release);
                }
                Err(err) => {
                    tracing::warn!(addr = %self.addr, error = %err, "Warehouse channel unavailable");
                    return Err(WarehouseError::Unavailable);
                }
            }
        }
        let Some(client) = channel.as_mut() else {
            return Err(WarehouseError::Unavailable);
        };

        let result = match tokio::time::timeout(self.rpc_timeout, client.prepare_order(user, items))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(WarehouseError::Timeout(self.rpc_timeout)),
        };

        if let Err(err) = &result {
            if err.breaks_channel() {
                tracing::warn!(error = %err, "Dropping warehouse channel");
                *channel = None;
                self.connected.store(false, Ordering::Release);
            }
        }
        result
    }

    async fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }
}
