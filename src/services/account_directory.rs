//! Read-only account lookup used by the order relay.

use async_trait::async_trait;

use crate::{db::DbPool, error::AppError, models::account::Account, services::account_service};

/// Keyed lookup of customer identity records.
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    /// The account with `id`, or `None` when there is none.
    async fn find_by_id(&self, id: i32) -> Result<Option<Account>, AppError>;
}

/// Directory backed by the `accounts` table.
#[derive(Clone)]
pub struct PgAccountDirectory {
    pool: DbPool,
}

impl PgAccountDirectory {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountDirectory for PgAccountDirectory {
    async fn find_by_id(&self, id: i32) -> Result<Option<Account>, AppError> {
        account_service::find_account(&self.pool, id).await
    }
}
