//! Business logic services.
//!
//! Services contain core business logic separated from HTTP handlers.
//! They handle database access, validation, and the warehouse relay.

pub mod account_directory;
pub mod account_service;
pub mod order_relay;
pub mod transaction_service;
