//! Order submission handler.
//!
//! - POST /api/order - Relay an order to the warehouse

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::{error::AppError, models::order::OrderRequest, services::order_relay::OrderRelay};

/// Submit an order for fulfillment.
///
/// # Endpoint
///
/// `POST /api/order`
///
/// # Request Body
///
/// ```json
/// {
///   "userId": "1",
///   "order": [{"_id": "123", "quantity": 2}]
/// }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: empty body; the order was accepted for processing, not fulfilled
/// - **Error (400)**: body missing/unparsable, non-integer `userId`, or empty `order`
/// - **Error (404)**: no account for `userId`
/// - **Error (503)**: warehouse channel unavailable
/// - **Error (502)**: warehouse call failed
pub async fn submit_order(
    State(relay): State<Arc<OrderRelay>>,
    payload: Result<Json<OrderRequest>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    // Every extractor rejection (content type, syntax, missing fields) is a 400 here
    let Json(request) = payload.map_err(|rejection| AppError::MalformedRequest(rejection.body_text()))?;

    relay.submit_order(request).await?;

    Ok(StatusCode::OK)
}
