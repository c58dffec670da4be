//! Account persistence.
//!
//! Plain CRUD over `accounts`, plus the account → transactions traversal.

use crate::{
    db::DbPool,
    error::AppError,
    models::{
        account::{Account, CreateAccountRequest},
        transaction::Transaction,
    },
};

const ACCOUNT_COLUMNS: &str = "id, name, middle_name, surname, address, credit_card, cvv";

/// Insert a new account.
///
/// # Errors
///
/// - `InvalidRequest`: card fields exceed their column widths
/// - `Database`: insert failed
pub async fn create_account(
    pool: &DbPool,
    request: CreateAccountRequest,
) -> Result<Account, AppError> {
    request.validate()?;

    let account = sqlx::query_as::<_, Account>(&format!(
        r#"
        INSERT INTO accounts (name, middle_name, surname, address, credit_card, cvv)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {ACCOUNT_COLUMNS}
        "#
    ))
    .bind(request.name)
    .bind(request.middle_name)
    .bind(request.surname)
    .bind(request.address)
    .bind(request.credit_card)
    .bind(request.cvv)
    .fetch_one(pool)
    .await?;

    tracing::info!(account_id = account.id, "Account created");
    Ok(account)
}

/// Get account by ID, `None` if it does not exist.
pub async fn find_account(pool: &DbPool, account_id: i32) -> Result<Option<Account>, AppError> {
    let account = sqlx::query_as::<_, Account>(&format!(
        "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"
    ))
    .bind(account_id)
    .fetch_optional(pool)
    .await?;

    Ok(account)
}

/// All accounts, ordered by id.
pub async fn list_accounts(pool: &DbPool) -> Result<Vec<Account>, AppError> {
    let accounts = sqlx::query_as::<_, Account>(&format!(
        "SELECT {ACCOUNT_COLUMNS} FROM accounts ORDER BY id"
    ))
    .fetch_all(pool)
    .await?;

    Ok(accounts)
}

/// Delete an account.
///
/// # Errors
///
/// - `AccountNotFound`: no such account
/// - `Conflict`: the account still owns transactions
pub async fn delete_account(pool: &DbPool, account_id: i32) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
        .bind(account_id)
        .execute(pool)
        .await
        .map_err(|err| match err {
            sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => AppError::Conflict(
                format!("Account {account_id} still has transactions"),
            ),
            other => AppError::Database(other),
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::AccountNotFound);
    }

    tracing::info!(account_id, "Account deleted");
    Ok(())
}

/// Transactions owned by an account.
///
/// # Errors
///
/// - `AccountNotFound`: no such account (distinguishes "missing" from "no transactions")
pub async fn list_account_transactions(
    pool: &DbPool,
    account_id: i32,
) -> Result<Vec<Transaction>, AppError> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM accounts WHERE id = $1)")
        .bind(account_id)
        .fetch_one(pool)
        .await?;

    if !exists {
        return Err(AppError::AccountNotFound);
    }

    let transactions = sqlx::query_as::<_, Transaction>(
        r#"
        SELECT id, account_id, amount, date_completed
        FROM transactions
        WHERE account_id = $1
        ORDER BY id
        "#,
    )
    .bind(account_id)
    .fetch_all(pool)
    .await?;

    Ok(transactions)
}
