//! Account management HTTP handlers.
//!
//! This module implements the account-related API endpoints:
//! - POST /api/accounts - Create new account
//! - GET /api/accounts - List all accounts
//! - GET /api/accounts/{id} - Get account by ID
//! - DELETE /api/accounts/{id} - Delete an account without transactions
//! - GET /api/accounts/{id}/transactions - Transactions owned by an account

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::{
    db::DbPool,
    error::AppError,
    models::{
        account::{AccountResponse, CreateAccountRequest},
        transaction::TransactionResponse,
    },
    services::account_service,
};

/// Create a new account.
///
/// # Request Body
///
/// ```json
/// {
///   "name": "Jane",
///   "middle_name": "Q",
///   "surname": "Doe",
///   "address": "1 Main St",
///   "credit_card": "4111111111111111",
///   "cvv": "123"
/// }
/// ```
///
/// # Response
///
/// - **Success (201 Created)**: the created account, without payment fields
/// - **Error (400)**: malformed body or card fields too long
pub async fn create_account(
    State(pool): State<DbPool>,
    payload: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AccountResponse>), AppError> {
    let Json(request) = payload.map_err(|rejection| AppError::MalformedRequest(rejection.body_text()))?;

    let account = account_service::create_account(&pool, request).await?;

    Ok((StatusCode::CREATED, Json(account.into())))
}

/// List all accounts, ordered by id.
pub async fn list_accounts(
    State(pool): State<DbPool>,
) -> Result<Json<Vec<AccountResponse>>, AppError> {
    let accounts = account_service::list_accounts(&pool).await?;

    Ok(Json(accounts.into_iter().map(Into::into).collect()))
}

/// Get a specific account by ID.
///
/// # Response
///
/// - **Success (200 OK)**: account details
/// - **Error (404)**: account not found
pub async fn get_account(
    State(pool): State<DbPool>,
    Path(account_id): Path<i32>,
) -> Result<Json<AccountResponse>, AppError> {
    let account = account_service::find_account(&pool, account_id)
        .await?
        .ok_or(AppError::AccountNotFound)?;

    Ok(Json(account.into()))
}

/// Delete an account.
///
/// # Response
///
/// - **Success (204 No Content)**
/// - **Error (404)**: account not found
/// - **Error (409)**: account still owns transactions
pub async fn delete_account(
    State(pool): State<DbPool>,
    Path(account_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    account_service::delete_account(&pool, account_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// List the transactions of one account.
pub async fn list_account_transactions(
    State(pool): State<DbPool>,
    Path(account_id): Path<i32>,
) -> Result<Json<Vec<TransactionResponse>>, AppError> {
    let transactions = account_service::list_account_transactions(&pool, account_id).await?;

    Ok(Json(transactions.into_iter().map(Into::into).collect()))
}
