//! Transaction HTTP handlers.
//!
//! This module implements transaction-related API endpoints:
//! - POST /api/transactions - Record a transaction
//! - GET /api/transactions - List all transactions
//! - GET /api/transactions/{id} - Get transaction details
//! - DELETE /api/transactions/{id} - Delete a transaction
//! - GET /api/transactions/{id}/account - Owning account

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::{
    db::DbPool,
    error::AppError,
    models::{
        account::AccountResponse,
        transaction::{CreateTransactionRequest, TransactionResponse},
    },
    services::transaction_service,
};

/// Record a transaction.
///
/// # Request Body
///
/// ```json
/// {
///   "account_id": 1,
///   "amount": 12.5,
///   "date_completed": "2024-03-01T10:00:00"
/// }
/// ```
///
/// # Response
///
/// - **Success (201 Created)**: the stored transaction
/// - **Error (404)**: `account_id` does not exist
pub async fn create_transaction(
    State(pool): State<DbPool>,
    payload: Result<Json<CreateTransactionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TransactionResponse>), AppError> {
    let Json(request) = payload.map_err(|rejection| AppError::MalformedRequest(rejection.body_text()))?;

    let transaction = transaction_service::create_transaction(&pool, request).await?;

    Ok((StatusCode::CREATED, Json(transaction.into())))
}

pub async fn list_transactions(
    State(pool): State<DbPool>,
) -> Result<Json<Vec<TransactionResponse>>, AppError> {
    let transactions = transaction_service::list_transactions(&pool).await?;

    Ok(Json(transactions.into_iter().map(Into::into).collect()))
}

/// Get transaction by ID.
pub async fn get_transaction(
    State(pool): State<DbPool>,
    Path(transaction_id): Path<i32>,
) -> Result<Json<TransactionResponse>, AppError> {
    let transaction = transaction_service::find_transaction(&pool, transaction_id)
        .await?
        .ok_or(AppError::TransactionNotFound)?;

    Ok(Json(transaction.into()))
}

pub async fn delete_transaction(
    State(pool): State<DbPool>,
    Path(transaction_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    transaction_service::delete_transaction(&pool, transaction_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Get the account a transaction belongs to.
pub async fn get_transaction_account(
    State(pool): State<DbPool>,
    Path(transaction_id): Path<i32>,
) -> Result<Json<AccountResponse>, AppError> {
    let account = transaction_service::find_transaction_account(&pool, transaction_id).await?;

    Ok(Json(account.into()))
}
