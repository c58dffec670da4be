//! Data models representing database entities and wire payloads.
//!
//! This module contains all data structures that map to database tables,
//! plus the order submission shapes exchanged with the warehouse.

/// Customer account model
pub mod account;
/// Order submission and warehouse call arguments
pub mod order;
/// Payment transaction model
pub mod transaction;
