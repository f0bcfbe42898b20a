use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::OrderView;
use crate::domain::ports::OrderRepository;

pub struct OrderService<R> {
    repo: R,
}

impl<R: OrderRepository> OrderService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn order_history(&self, user_id: Uuid) -> Result<Vec<OrderView>, DomainError> {
        self.repo.list_for_user(user_id)
    }

    /// Deletes the order and its items. Other users' orders look missing.
    pub fn delete_order(&self, user_id: Uuid, order_id: Uuid) -> Result<(), DomainError> {
        if self.repo.delete_for_user(user_id, order_id)? {
            log::info!("Deleted order {} for user {}", order_id, user_id);
            Ok(())
        } else {
            Err(DomainError::NotFound)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use bigdecimal::BigDecimal;
    use chrono::Utc;

    use super::*;

    #[derive(Default)]
    struct InMemoryOrders {
        orders: Mutex<Vec<OrderView>>,
    }

    impl OrderRepository for InMemoryOrders {
        fn list_for_user(&self, user_id: Uuid) -> Result<Vec<OrderView>, DomainError> {
            Ok(self
                .orders
                .lock()
                .unwrap()
                .iter()
                .filter(|o| o.user_id == user_id)
                .cloned()
                .collect())
        }

        fn delete_for_user(&self, user_id: Uuid, order_id: Uuid) -> Result<bool, DomainError> {
            let mut orders = self.orders.lock().unwrap();
            let before = orders.len();
            orders.retain(|o| !(o.id == order_id && o.user_id == user_id));
            Ok(orders.len() < before)
        }
    }

    fn order(user_id: Uuid) -> OrderView {
        OrderView {
            id: Uuid::new_v4(),
            user_id,
            status: "pending".into(),
            payment_status: "unpaid".into(),
            total_amount: BigDecimal::from(10),
            shipping_address: None,
            created_at: Utc::now(),
            items: vec![],
        }
    }

    #[test]
    fn history_only_contains_own_orders() {
        let me = Uuid::new_v4();
        let repo = InMemoryOrders::default();
        repo.orders
            .lock()
            .unwrap()
            .extend([order(me), order(Uuid::new_v4()), order(me)]);
        let service = OrderService::new(repo);

        let history = service.order_history(me).unwrap();
        assert_eq!(history.len(), 2);
        assert!(history.iter().all(|o| o.user_id == me));
    }

    #[test]
    fn deleting_someone_elses_order_is_not_found() {
        let owner = Uuid::new_v4();
        let theirs = order(owner);
        let order_id = theirs.id;
        let repo = InMemoryOrders::default();
        repo.orders.lock().unwrap().push(theirs);
        let service = OrderService::new(repo);

        let err = service.delete_order(Uuid::new_v4(), order_id).unwrap_err();
        assert!(matches!(err, DomainError::NotFound));
        assert!(service.delete_order(owner, order_id).is_ok());
        assert!(service.order_history(owner).unwrap().is_empty());
    }
}
