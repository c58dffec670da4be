//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, URL params, etc.)
//! 2. Delegates to a service
//! 3. Returns HTTP response (JSON, status code)

/// Account CRUD endpoints
pub mod accounts;
/// Service health endpoint
pub mod health;
/// Order relay endpoint
pub mod orders;
/// Transaction CRUD endpoints
pub mod transactions;
