//! Transaction data models and API request/response types.
//!
//! This module defines:
//! - `Transaction`: Database entity representing a completed payment
//! - `CreateTransactionRequest`: Request body for recording a transaction
//! - `TransactionResponse`: Response body returned to clients

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Represents a transaction record from the database.
///
/// # Database Table
///
/// Maps to the `transactions` table. Each transaction:
/// - Belongs to exactly one account (`account_id` is a NOT NULL foreign key)
/// - Stores the amount as double precision, as the payments schema does
/// - Optionally records when it completed
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Transaction {
    pub id: i32,

    /// Owning account
    pub account_id: i32,

    pub amount: f64,

    /// Completion time (`timestamp without time zone`)
    pub date_completed: Option<NaiveDateTime>,
}

/// Request to record a transaction against an account.
///
/// # JSON Example
///
/// ```json
/// {
///   "account_id": 1,
///   "amount": 12.5,
///   "date_completed": "2024-03-01T10:00:00"
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    /// Account the transaction belongs to (must exist)
    pub account_id: i32,

    pub amount: f64,

    #[serde(default)]
    pub date_completed: Option<NaiveDateTime>,
}

/// Response returned for transaction operations.
///
/// # JSON Example
///
/// ```json
/// {
///   "id": 10,
///   "account_id": 1,
///   "amount": 12.5,
///   "date_completed": "2024-03-01T10:00:00"
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    pub id: i32,
    pub account_id: i32,
    pub amount: f64,
    pub date_completed: Option<NaiveDateTime>,
}

impl From<Transaction> for TransactionResponse {
    fn from(transaction: Transaction) -> Self {
        Self {
            id: transaction.id,
            account_id: transaction.account_id,
            amount: transaction.amount,
            date_completed: transaction.date_completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_parses_naive_timestamp() {
        let request: CreateTransactionRequest = serde_json::from_str(
            r#"{"account_id": 1, "amount": 12.5, "date_completed": "2024-03-01T10:00:00"}"#,
        )
        .unwrap();

        assert_eq!(request.account_id, 1);
        assert_eq!(request.amount, 12.5);
        assert_eq!(
            request.date_completed.unwrap().to_string(),
            "2024-03-01 10:00:00"
        );
    }

    #[test]
    fn response_carries_every_column() {
        let transaction = Transaction {
            id: 10,
            account_id: 1,
            amount: 12.5,
            date_completed: None,
        };

        let json = serde_json::to_value(TransactionResponse::from(transaction)).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"id": 10, "account_id": 1, "amount": 12.5, "date_completed": null})
        );
    }

    #[test]
    fn create_request_date_is_optional() {
        let request: CreateTransactionRequest =
            serde_json::from_str(r#"{"account_id": 1, "amount": 3.0}"#).unwrap();

        assert!(request.date_completed.is_none());
    }
}
