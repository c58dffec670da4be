//! Thrift client bound to one buffered stream.

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufStream};
use tokio::net::TcpStream;

use super::error::WarehouseError;
use super::protocol::{self, Decoder};
use crate::models::order::{OrderItem, WarehouseUserInfo};

/// One request/response channel to the warehouse.
///
/// Calls take `&mut self`; the caller is responsible for serializing access.
pub struct WarehouseClient<S = TcpStream> {
    stream: BufStream<S>,
    seq_id: i32,
}

impl WarehouseClient<TcpStream> {
    /// Open a TCP connection to `addr` and bind a client to it.
    pub async fn connect(addr: &str) -> Result<Self, WarehouseError> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(WarehouseError::Connection)?;
        stream.set_nodelay(true).map_err(WarehouseError::Connection)?;
        Ok(Self::new(stream))
    }
}

impl<S> WarehouseClient<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    pub fn new(stream: S) -> Self {
        Self {
            stream: BufStream::new(stream),
            seq_id: 0,
        }
    }

    /// Send `prepareOrder(user, items)` and wait for the reply.
    pub async fn prepare_order(
        &mut self,
        user: &WarehouseUserInfo,
        items: &[OrderItem],
    ) -> Result<(), WarehouseError> {
        self.seq_id = self.seq_id.wrapping_add(1);
        let frame = protocol::encode_prepare_order_call(self.seq_id, user, items);

        self.stream
            .write_all(&frame)
            .await
            .map_err(WarehouseError::Transport)?;
        self.stream.flush().await.map_err(WarehouseError::Transport)?;

        let mut dec = Decoder::new(&mut self.stream);
        protocol::read_prepare_order_reply(&mut dec, self.seq_id).await??;
        Ok(())
    }

    /// Flush and close the write half.
    pub async fn shutdown(&mut self) -> std::io::Result<()> {
        self.stream.shutdown().await
    }
}
