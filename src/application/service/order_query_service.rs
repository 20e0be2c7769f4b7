use crate::application::ApplicationError;
use crate::domain::model::{DayDate, Order, OrderId};
use crate::domain::port::OrderRepository;
use std::sync::Arc;

/// 注文クエリサービス
/// 読み取り専用の注文操作を提供する
pub struct OrderQueryService {
    order_repository: Arc<dyn OrderRepository>,
}

impl OrderQueryService {
    /// 新しい注文クエリサービスを作成
    ///
    /// # Arguments
    /// * `order_repository` - 注文リポジトリ
    pub fn new(order_repository: Arc<dyn OrderRepository>) -> Self {
        Self { order_repository }
    }

    /// 注文IDで注文を取得
    ///
    /// # Arguments
    /// * `id` - 注文ID
    ///
    /// # Returns
    /// * `Ok(Some(Order))` - 注文が見つかった
    /// * `Ok(None)` - 注文が見つからなかった
    /// * `Err(ApplicationError)` - 取得失敗
    pub async fn get_order_by_id(&self, id: OrderId) -> Result<Option<Order>, ApplicationError> {
        self.order_repository
            .find_by_id(id)
            .await
            .map_err(ApplicationError::from)
    }

    /// すべての注文を取得
    /// 営業日の降順（新しい日が先）、受け渡し時刻の昇順で並べて返す
    ///
    /// # Returns
    /// * `Ok(Vec<Order>)` - 注文のリスト
    /// * `Err(ApplicationError)` - 取得失敗
    pub async fn get_all_orders(&self) -> Result<Vec<Order>, ApplicationError> {
        self.order_repository
            .find_all()
            .await
            .map_err(ApplicationError::from)
    }

    /// 指定した営業日の注文を取得
    /// 受け渡し時刻の昇順で並べて返す
    ///
    /// # Arguments
    /// * `date` - 営業日
    ///
    /// # Returns
    /// * `Ok(Vec<Order>)` - 注文のリスト
    /// * `Err(ApplicationError)` - 取得失敗
    pub async fn get_orders_by_date(&self, date: DayDate) -> Result<Vec<Order>, ApplicationError> {
        self.order_repository
            .find_by_date(date)
            .await
            .map_err(ApplicationError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{DeliveryType, Money, PaymentMethod, TimeOfDay};
    use crate::domain::port::RepositoryError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    // テスト用のモックリポジトリ
    struct MockOrderRepository {
        orders: Mutex<HashMap<OrderId, Order>>,
    }

    impl MockOrderRepository {
        fn new() -> Self {
            Self {
                orders: Mutex::new(HashMap::new()),
            }
        }

        fn add_order(&self, order: Order) {
            let mut orders = self.orders.lock().unwrap();
            orders.insert(order.id(), order);
        }
    }

    #[async_trait]
    impl OrderRepository for MockOrderRepository {
        async fn save(&self, order: &Order) -> Result<(), RepositoryError> {
            let mut orders = self.orders.lock().unwrap();
            orders.insert(order.id(), order.clone());
            Ok(())
        }

        async fn find_by_id(&self, order_id: OrderId) -> Result<Option<Order>, RepositoryError> {
            let orders = self.orders.lock().unwrap();
            Ok(orders.get(&order_id).cloned())
        }

        async fn find_all(&self) -> Result<Vec<Order>, RepositoryError> {
            let orders = self.orders.lock().unwrap();
            Ok(orders.values().cloned().collect())
        }

        async fn find_by_date(&self, date: DayDate) -> Result<Vec<Order>, RepositoryError> {
            let orders = self.orders.lock().unwrap();
            Ok(orders
                .values()
                .filter(|order| order.order_date() == date)
                .cloned()
                .collect())
        }

        async fn delete(&self, order_id: OrderId) -> Result<bool, RepositoryError> {
            let mut orders = self.orders.lock().unwrap();
            Ok(orders.remove(&order_id).is_some())
        }

        fn next_identity(&self) -> OrderId {
            OrderId::new()
        }
    }

    fn build_order(date: &str) -> Order {
        Order::new(
            OrderId::new(),
            "Ana García".to_string(),
            "1x Muzzarella".to_string(),
            TimeOfDay::from_string("20:30").unwrap(),
            Money::ars(1500),
            PaymentMethod::Cash,
            DeliveryType::Pickup,
            DayDate::from_string(date).unwrap(),
            1,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_get_order_by_id_found() {
        let repository = Arc::new(MockOrderRepository::new());
        let service = OrderQueryService::new(repository.clone());

        let order = build_order("2025-03-14");
        let order_id = order.id();
        repository.add_order(order);

        let result = service.get_order_by_id(order_id).await;
        assert!(result.is_ok());
        let found_order = result.unwrap();
        assert!(found_order.is_some());
        assert_eq!(found_order.unwrap().id(), order_id);
    }

    #[tokio::test]
    async fn test_get_order_by_id_not_found() {
        let repository = Arc::new(MockOrderRepository::new());
        let service = OrderQueryService::new(repository);

        let result = service.get_order_by_id(OrderId::new()).await;
        assert!(result.is_ok());
        assert!(result.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_all_orders() {
        let repository = Arc::new(MockOrderRepository::new());
        let service = OrderQueryService::new(repository.clone());

        repository.add_order(build_order("2025-03-14"));
        repository.add_order(build_order("2025-03-15"));

        let result = service.get_all_orders().await;
        assert!(result.is_ok());
        assert_eq!(result.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_get_orders_by_date() {
        let repository = Arc::new(MockOrderRepository::new());
        let service = OrderQueryService::new(repository.clone());

        repository.add_order(build_order("2025-03-14"));
        repository.add_order(build_order("2025-03-14"));
        repository.add_order(build_order("2025-03-15"));

        let result = service
            .get_orders_by_date(DayDate::from_string("2025-03-14").unwrap())
            .await;
        assert!(result.is_ok());
        let orders = result.unwrap();
        assert_eq!(orders.len(), 2);
        for order in orders {
            assert_eq!(order.order_date().to_string(), "2025-03-14");
        }
    }
}
