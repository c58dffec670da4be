//! Order submission models.
//!
//! - `OrderRequest`: JSON body of `POST /api/order`
//! - `OrderItem` / `WarehouseUserInfo`: the argument shapes of the warehouse `prepareOrder` call
//!
//! None of these are persisted; they live for a single relay call.

use serde::Deserialize;

use crate::models::account::Account;

/// Inbound order submission.
///
/// # JSON Example
///
/// ```json
/// {
///   "userId": "1",
///   "order": [{"_id": "123", "quantity": 2}]
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub user_id: UserId,
    pub order: Vec<OrderLine>,
}

/// Account identifier as sent by the front end: either a JSON string or a number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Number(i64),
    Text(String),
}

impl UserId {
    /// Integer account id, if the value converts to one.
    pub fn to_account_id(&self) -> Option<i32> {
        match self {
            UserId::Number(n) => i32::try_from(*n).ok(),
            UserId::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserId::Number(n) => write!(f, "{n}"),
            UserId::Text(s) => f.write_str(s),
        }
    }
}

/// One `{"_id", "quantity"}` entry of the inbound order.
///
/// Quantity sign and item existence are the warehouse's concern and are not checked here.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderLine {
    #[serde(rename = "_id")]
    pub item_id: String,
    pub quantity: i32,
}

/// Warehouse `ItemInfo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItem {
    pub item_id: String,
    pub quantity: i32,
}

impl From<OrderLine> for OrderItem {
    fn from(line: OrderLine) -> Self {
        Self {
            item_id: line.item_id,
            quantity: line.quantity,
        }
    }
}

/// Warehouse `UserInfo`: the identity part of an [`Account`], without payment fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarehouseUserInfo {
    /// Account id in string form
    pub id: String,
    pub name: Option<String>,
    pub middle_name: Option<String>,
    pub surname: Option<String>,
    pub address: Option<String>,
}

impl From<&Account> for WarehouseUserInfo {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.to_string(),
            name: account.name.clone(),
            middle_name: account.middle_name.clone(),
            surname: account.surname.clone(),
            address: account.address.clone(),
        }
    }
}
