//! Order relay - translates an inbound order into the warehouse `prepareOrder` call.
//!
//! # Process
//!
//! 1. Validate the submission (convertible `userId`, non-empty `order`)
//! 2. Resolve the account through the [`AccountDirectory`]
//! 3. Build `WarehouseUserInfo` and the item list (input order preserved)
//! 4. Dispatch through the [`WarehouseGateway`]
//!
//! The lookup always runs before dispatch, even when the warehouse is down.
//! Delivery is at-most-once: nothing is persisted, retried, or deduplicated.

use std::sync::Arc;

use crate::{
    error::AppError,
    models::order::{OrderItem, OrderRequest, WarehouseUserInfo},
    services::account_directory::AccountDirectory,
    warehouse::WarehouseGateway,
};

pub struct OrderRelay {
    directory: Arc<dyn AccountDirectory>,
    warehouse: Arc<dyn WarehouseGateway>,
}

impl OrderRelay {
    pub fn new(directory: Arc<dyn AccountDirectory>, warehouse: Arc<dyn WarehouseGateway>) -> Self {
        Self {
            directory,
            warehouse,
        }
    }

    /// Relay one order submission.
    ///
    /// # Errors
    ///
    /// - `MalformedRequest`: `userId` is not an integer, or `order` is empty
    /// - `AccountNotFound`: no account for `userId` (the warehouse is not called)
    /// - `UpstreamUnavailable`: no warehouse channel
    /// - `UpstreamRpc`: the warehouse call failed
    pub async fn submit_order(&self, request: OrderRequest) -> Result<(), AppError> {
        let account_id = request.user_id.to_account_id().ok_or_else(|| {
            AppError::MalformedRequest(format!(
                "userId {:?} is not an account identifier",
                request.user_id.to_string()
            ))
        })?;

        if request.order.is_empty() {
            return Err(AppError::MalformedRequest(
                "order must contain at least one item".to_string(),
            ));
        }

        let account = self
            .directory
            .find_by_id(account_id)
            .await?
            .ok_or(AppError::AccountNotFound)?;

        let user = WarehouseUserInfo::from(&account);
        let items: Vec<OrderItem> = request.order.into_iter().map(OrderItem::from).collect();

        tracing::info!(
            account_id,
            item_count = items.len(),
            "Relaying order to warehouse"
        );

        self.warehouse.prepare_order(&user, &items).await?;

        tracing::info!(account_id, "Order accepted by warehouse");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::account::Account;
    use crate::models::order::{OrderLine, UserId};
    use crate::warehouse::{RemoteFault, WarehouseError};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct FakeDirectory {
        accounts: HashMap<i32, Account>,
        lookups: AtomicUsize,
    }

    #[async_trait]
    impl AccountDirectory for FakeDirectory {
        async fn find_by_id(&self, id: i32) -> Result<Option<Account>, AppError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            Ok(self.accounts.get(&id).cloned())
        }
    }

    enum Behaviour {
        Accept,
        Unavailable,
        Fault(RemoteFault),
    }

    struct FakeWarehouse {
        behaviour: Behaviour,
        calls: Mutex<Vec<(WarehouseUserInfo, Vec<OrderItem>)>>,
    }

    impl FakeWarehouse {
        fn new(behaviour: Behaviour) -> Arc<Self> {
            Arc::new(Self {
                behaviour,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<(WarehouseUserInfo, Vec<OrderItem>)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl WarehouseGateway for FakeWarehouse {
        async fn prepare_order(
            &self,
            user: &WarehouseUserInfo,
            items: &[OrderItem],
        ) -> Result<(), WarehouseError> {
            match &self.behaviour {
                Behaviour::Unavailable => Err(WarehouseError::Unavailable),
                Behaviour::Accept => {
                    self.calls
                        .lock()
                        .unwrap()
                        .push((user.clone(), items.to_vec()));
                    Ok(())
                }
                Behaviour::Fault(fault) => Err(WarehouseError::Remote(fault.clone())),
            }
        }

        async fn is_connected(&self) -> bool {
            !matches!(self.behaviour, Behaviour::Unavailable)
        }
    }

    fn jane() -> Account {
        Account {
            id: 1,
            name: Some("Jane".into()),
            middle_name: Some("Q".into()),
            surname: Some("Doe".into()),
            address: Some("1 Main St".into()),
            credit_card: Some("4111111111111111".into()),
            cvv: Some("123".into()),
        }
    }

    fn directory_with_jane() -> Arc<FakeDirectory> {
        let mut directory = FakeDirectory::default();
        directory.accounts.insert(1, jane());
        Arc::new(directory)
    }

    fn request(user_id: UserId, lines: &[(&str, i32)]) -> OrderRequest {
        OrderRequest {
            user_id,
            order: lines
                .iter()
                .map(|(id, quantity)| OrderLine {
                    item_id: id.to_string(),
                    quantity: *quantity,
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn relays_identity_and_items_in_order() {
        let warehouse = FakeWarehouse::new(Behaviour::Accept);
        let relay = OrderRelay::new(directory_with_jane(), warehouse.clone());

        relay
            .submit_order(request(
                UserId::Text("1".into()),
                &[("123", 2), ("7", 0), ("55", -3)],
            ))
            .await
            .unwrap();

        let calls = warehouse.calls();
        assert_eq!(calls.len(), 1);
        let (user, items) = &calls[0];
        assert_eq!(
            *user,
            WarehouseUserInfo {
                id: "1".into(),
                name: Some("Jane".into()),
                middle_name: Some("Q".into()),
                surname: Some("Doe".into()),
                address: Some("1 Main St".into()),
            }
        );
        let pairs: Vec<(&str, i32)> = items
            .iter()
            .map(|i| (i.item_id.as_str(), i.quantity))
            .collect();
        assert_eq!(pairs, vec![("123", 2), ("7", 0), ("55", -3)]);
    }

    #[tokio::test]
    async fn unknown_account_never_reaches_warehouse() {
        let warehouse = FakeWarehouse::new(Behaviour::Accept);
        let relay = OrderRelay::new(directory_with_jane(), warehouse.clone());

        let err = relay
            .submit_order(request(UserId::Number(99), &[("123", 1)]))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::AccountNotFound));
        assert!(warehouse.calls().is_empty());
    }

    #[tokio::test]
    async fn lookup_happens_before_unavailable_dispatch() {
        let directory = directory_with_jane();
        let relay = OrderRelay::new(directory.clone(), FakeWarehouse::new(Behaviour::Unavailable));

        let err = relay
            .submit_order(request(UserId::Text("1".into()), &[("123", 2)]))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::UpstreamUnavailable));
        assert_eq!(directory.lookups.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn remote_fault_becomes_rpc_error() {
        let relay = OrderRelay::new(
            directory_with_jane(),
            FakeWarehouse::new(Behaviour::Fault(RemoteFault::EntityNotFound(
                "Item with id 123 wasn't found.".into(),
            ))),
        );

        let err = relay
            .submit_order(request(UserId::Text("1".into()), &[("123", 2)]))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::UpstreamRpc(msg) if msg.contains("123")));
    }

    #[tokio::test]
    async fn non_numeric_user_id_is_malformed() {
        let directory = directory_with_jane();
        let relay = OrderRelay::new(directory.clone(), FakeWarehouse::new(Behaviour::Accept));

        let err = relay
            .submit_order(request(UserId::Text("jane".into()), &[("123", 2)]))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::MalformedRequest(_)));
        assert_eq!(directory.lookups.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_order_is_malformed() {
        let relay = OrderRelay::new(directory_with_jane(), FakeWarehouse::new(Behaviour::Accept));

        let err = relay
            .submit_order(request(UserId::Text("1".into()), &[]))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::MalformedRequest(_)));
    }
}
