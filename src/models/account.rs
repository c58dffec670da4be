//! Account data models and API request/response types.
//!
//! This module defines:
//! - `Account`: Database entity representing a customer account
//! - `CreateAccountRequest`: Request body for creating accounts
//! - `AccountResponse`: Response body returned to clients

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Column width of `accounts.credit_card`.
pub const CREDIT_CARD_MAX_LEN: usize = 16;

/// Column width of `accounts.cvv`.
pub const CVV_MAX_LEN: usize = 3;

/// Represents an account record from the database.
///
/// # Database Table
///
/// Maps to the `accounts` table. Each account:
/// - Holds the customer identity used for warehouse orders (name, middle name, surname, address)
/// - Stores payment card details that are never sent to the warehouse or returned by the API
/// - Owns zero or more rows in `transactions`
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Account {
    /// Integer primary key
    pub id: i32,

    pub name: Option<String>,

    pub middle_name: Option<String>,

    pub surname: Option<String>,

    pub address: Option<String>,

    /// Card number (up to 16 characters)
    pub credit_card: Option<String>,

    /// Card verification value (up to 3 characters)
    pub cvv: Option<String>,
}

/// Request body for creating a new account.
///
/// # JSON Example
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
/// # Validation
///
/// - Every field is optional
/// - `credit_card` must fit in 16 characters, `cvv` in 3
#[derive(Debug, Default, Deserialize)]
pub struct CreateAccountRequest {
    pub name: Option<String>,
    pub middle_name: Option<String>,
    pub surname: Option<String>,
    pub address: Option<String>,
    pub credit_card: Option<String>,
    pub cvv: Option<String>,
}

impl CreateAccountRequest {
    /// Reject values that do not fit the table's column widths.
    pub fn validate(&self) -> Result<(), AppError> {
        if exceeds(&self.credit_card, CREDIT_CARD_MAX_LEN) {
            return Err(AppError::InvalidRequest(format!(
                "credit_card must be at most {CREDIT_CARD_MAX_LEN} characters"
            )));
        }
        if exceeds(&self.cvv, CVV_MAX_LEN) {
            return Err(AppError::InvalidRequest(format!(
                "cvv must be at most {CVV_MAX_LEN} characters"
            )));
        }
        Ok(())
    }
}

fn exceeds(value: &Option<String>, max: usize) -> bool {
    value.as_ref().is_some_and(|v| v.chars().count() > max)
}

/// Response body for account endpoints.
///
/// # JSON Example
///
/// ```json
/// {
///   "id": 1,
///   "name": "Jane",
///   "middle_name": "Q",
///   "surname": "Doe",
///   "address": "1 Main St"
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub id: i32,
    pub name: Option<String>,
    pub middle_name: Option<String>,
    pub surname: Option<String>,
    pub address: Option<String>,
}

/// Convert database Account to API AccountResponse.
///
/// This transformation removes the `credit_card` and `cvv` fields
impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            name: account.name,
            middle_name: account.middle_name,
            surname: account.surname,
            address: account.address,
        }
    }
}
