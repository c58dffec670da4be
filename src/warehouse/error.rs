//! Warehouse channel errors.

use std::time::Duration;

use thiserror::Error;

/// Fault raised by the warehouse service itself.
///
/// The first three mirror the exceptions `prepareOrder` declares; anything else
/// arrives as a Thrift application exception.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteFault {
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("warehouse database error: {0}")]
    Database(String),

    #[error("application exception (type {kind}): {message}")]
    Application { kind: i32, message: String },
}

impl RemoteFault {
    /// Field id of the declared exception in the `prepareOrder` result struct.
    pub fn field_id(&self) -> Option<i16> {
        match self {
            RemoteFault::EntityNotFound(_) => Some(1),
            RemoteFault::Validation(_) => Some(2),
            RemoteFault::Database(_) => Some(3),
            RemoteFault::Application { .. } => None,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            RemoteFault::EntityNotFound(m)
            | RemoteFault::Validation(m)
            | RemoteFault::Database(m) => m,
            RemoteFault::Application { message, .. } => message,
        }
    }
}

/// Malformed or unexpected bytes on the wire.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("bad protocol version word {0:#010x}")]
    BadVersion(u32),

    #[error("unknown message type {0}")]
    UnknownMessageType(u8),

    #[error("unknown field type {0}")]
    UnknownFieldType(u8),

    #[error("unexpected {0} message")]
    UnexpectedMessageType(&'static str),

    #[error("negative length {0}")]
    NegativeSize(i32),

    #[error("length {0} exceeds limit")]
    SizeLimit(usize),

    #[error("nesting too deep")]
    DepthLimit,

    #[error("string is not valid UTF-8")]
    InvalidUtf8,

    #[error("reply for {name}#{seq_id} does not match the pending call")]
    UnexpectedReply { name: String, seq_id: i32 },
}

/// Everything that can go wrong talking to the warehouse.
#[derive(Debug, Error)]
pub enum WarehouseError {
    /// The TCP connection could not be established.
    #[error("cannot connect to warehouse: {0}")]
    Connection(#[source] std::io::Error),

    /// No live channel at dispatch time.
    #[error("warehouse channel unavailable")]
    Unavailable,

    #[error("warehouse rejected the call: {0}")]
    Remote(#[from] RemoteFault),

    #[error("warehouse transport failed: {0}")]
    Transport(#[source] std::io::Error),

    #[error("warehouse call exceeded {0:?}")]
    Timeout(Duration),

    #[error("warehouse protocol error: {0}")]
    Protocol(#[source] ProtocolError),
}

impl From<ProtocolError> for WarehouseError {
    fn from(err: ProtocolError) -> Self {
        match err {
            ProtocolError::Io(io) => WarehouseError::Transport(io),
            other => WarehouseError::Protocol(other),
        }
    }
}

impl WarehouseError {
    /// Whether the stream is left in an unknown state and must not be reused.
    pub fn breaks_channel(&self) -> bool {
        matches!(
            self,
            WarehouseError::Transport(_) | WarehouseError::Timeout(_) | WarehouseError::Protocol(_)
        )
    }
}
