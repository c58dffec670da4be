//! Transaction persistence.
//!
//! Transactions are recorded and removed through the CRUD surface only; the
//! order relay never writes here.

use crate::{
    db::DbPool,
    error::AppError,
    models::{
        account::Account,
        transaction::{CreateTransactionRequest, Transaction},
    },
};

/// Record a transaction against an existing account.
///
/// # Errors
///
/// - `AccountNotFound`: `account_id` does not reference an account
/// - `Database`: insert failed
pub async fn create_transaction(
    pool: &DbPool,
    request: CreateTransactionRequest,
) -> Result<Transaction, AppError> {
    // The foreign key enforces ownership atomically; a violation means the account is missing.
    let transaction = sqlx::query_as::<_, Transaction>(
        r#"
        INSERT INTO transactions (account_id, amount, date_completed)
        VALUES ($1, $2, $3)
        RETURNING id, account_id, amount, date_completed
        "#,
    )
    .bind(request.account_id)
    .bind(request.amount)
    .bind(request.date_completed)
    .fetch_one(pool)
    .await
    .map_err(|err| match err {
        sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => AppError::AccountNotFound,
        other => AppError::Database(other),
    })?;

    tracing::info!(
        transaction_id = transaction.id,
        account_id = transaction.account_id,
        "Transaction recorded"
    );
    Ok(transaction)
}

/// Get transaction by ID.
pub async fn find_transaction(
    pool: &DbPool,
    transaction_id: i32,
) -> Result<Option<Transaction>, AppError> {
    let transaction = sqlx::query_as::<_, Transaction>(
        "SELECT id, account_id, amount, date_completed FROM transactions WHERE id = $1",
    )
    .bind(transaction_id)
    .fetch_optional(pool)
    .await?;

    Ok(transaction)
}

/// All transactions, ordered by id.
pub async fn list_transactions(pool: &DbPool) -> Result<Vec<Transaction>, AppError> {
    let transactions = sqlx::query_as::<_, Transaction>(
        "SELECT id, account_id, amount, date_completed FROM transactions ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    Ok(transactions)
}

/// Delete a transaction.
pub async fn delete_transaction(pool: &DbPool, transaction_id: i32) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM transactions WHERE id = $1")
        .bind(transaction_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::TransactionNotFound);
    }

    tracing::info!(transaction_id, "Transaction deleted");
    Ok(())
}

/// The account owning a transaction.
///
/// # Errors
///
/// - `TransactionNotFound`: no such transaction
pub async fn find_transaction_account(
    pool: &DbPool,
    transaction_id: i32,
) -> Result<Account, AppError> {
    let account = sqlx::query_as::<_, Account>(
        r#"
        SELECT a.id, a.name, a.middle_name, a.surname, a.address, a.credit_card, a.cvv
        FROM transactions t
        JOIN accounts a ON a.id = t.account_id
        WHERE t.id = $1
        "#,
    )
    .bind(transaction_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::TransactionNotFound)?;

    Ok(account)
}
