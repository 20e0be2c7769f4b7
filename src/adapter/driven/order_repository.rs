use crate::adapter::database_error::DatabaseError;
use crate::domain::model::{
    DayDate, DeliveryType, Money, Order, OrderId, PaymentMethod, TimeOfDay,
};
use crate::domain::port::{OrderRepository, RepositoryError};
use async_trait::async_trait;
use sqlx::{MySql, Pool, Row};

/// MySQL注文リポジトリ
/// MySQLデータベースを使用して注文を永続化する
pub struct MySqlOrderRepository {
    pool: Pool<MySql>,
}

impl MySqlOrderRepository {
    /// 新しいMySQL注文リポジトリを作成
    ///
    /// # Arguments
    /// * `pool` - MySQLコネクションプール
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }

    /// データベースの行から注文集約を再構築する
    fn build_order_from_row(row: &sqlx::mysql::MySqlRow) -> Result<Order, RepositoryError> {
        let id = OrderId::from_string(row.get("id")).map_err(|e| {
            RepositoryError::FetchFailed(format!("注文IDの解析に失敗しました: {}", e))
        })?;
        let delivery_time = TimeOfDay::from_string(row.get("delivery_time")).map_err(|e| {
            RepositoryError::FetchFailed(format!("受け渡し時刻の解析に失敗しました: {}", e))
        })?;
        let total = Money::new(
            row.get::<i64, _>("total_amount"),
            row.get::<String, _>("total_currency"),
        )
        .map_err(|e| RepositoryError::FetchFailed(format!("金額の構築に失敗しました: {}", e)))?;
        let payment_method = PaymentMethod::from_string(row.get("payment_method")).map_err(|e| {
            RepositoryError::FetchFailed(format!("支払い方法の解析に失敗しました: {}", e))
        })?;
        let delivery_type = DeliveryType::from_string(row.get("delivery_type")).map_err(|e| {
            RepositoryError::FetchFailed(format!("受け渡し方法の解析に失敗しました: {}", e))
        })?;
        let order_date = DayDate::from_string(row.get("order_date")).map_err(|e| {
            RepositoryError::FetchFailed(format!("営業日の解析に失敗しました: {}", e))
        })?;

        Ok(Order::reconstruct(
            id,
            row.get("customer_name"),
            row.get("summary"),
            delivery_time,
            total,
            payment_method,
            delivery_type,
            order_date,
            row.get::<u32, _>("pizza_units"),
            row.get::<bool, _>("sent"),
        ))
    }
}

#[async_trait]
impl OrderRepository for MySqlOrderRepository {
    async fn save(&self, order: &Order) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO orders (
                id, customer_name, summary, delivery_time,
                total_amount, total_currency, payment_method, delivery_type,
                order_date, pizza_units, sent
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                customer_name = VALUES(customer_name),
                summary = VALUES(summary),
                delivery_time = VALUES(delivery_time),
                total_amount = VALUES(total_amount),
                total_currency = VALUES(total_currency),
                payment_method = VALUES(payment_method),
                delivery_type = VALUES(delivery_type),
                order_date = VALUES(order_date),
                pizza_units = VALUES(pizza_units),
                sent = VALUES(sent)
            "#,
        )
        .bind(order.id().to_string())
        .bind(order.customer_name())
        .bind(order.summary())
        .bind(order.delivery_time().to_string())
        .bind(order.total().amount())
        .bind(order.total().currency())
        .bind(order.payment_method().to_string())
        .bind(order.delivery_type().to_string())
        .bind(order.order_date().to_string())
        .bind(order.pizza_units())
        .bind(order.is_sent())
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("注文の保存に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        Ok(())
    }

    async fn find_by_id(&self, order_id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT id, customer_name, summary, delivery_time,
                   total_amount, total_currency, payment_method, delivery_type,
                   order_date, pizza_units, sent
            FROM orders
            WHERE id = ?
            "#,
        )
        .bind(order_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("注文の取得に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        match row {
            Some(row) => Ok(Some(Self::build_order_from_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_all(&self) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT id, customer_name, summary, delivery_time,
                   total_amount, total_currency, payment_method, delivery_type,
                   order_date, pizza_units, sent
            FROM orders
            ORDER BY order_date DESC, delivery_time ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("注文一覧の取得に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        rows.iter().map(Self::build_order_from_row).collect()
    }

    async fn find_by_date(&self, date: DayDate) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT id, customer_name, summary, delivery_time,
                   total_amount, total_currency, payment_method, delivery_type,
                   order_date, pizza_units, sent
            FROM orders
            WHERE order_date = ?
            ORDER BY delivery_time ASC
            "#,
        )
        .bind(date.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DatabaseError::QueryError(format!("営業日別注文一覧の取得に失敗しました: {}", e))
        })
        .map_err(RepositoryError::from)?;

        rows.iter().map(Self::build_order_from_row).collect()
    }

    async fn delete(&self, order_id: OrderId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = ?")
            .bind(order_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::QueryError(format!("注文の削除に失敗しました: {}", e)))
            .map_err(RepositoryError::from)?;

        Ok(result.rows_affected() > 0)
    }

    fn next_identity(&self) -> OrderId {
        OrderId::new()
    }
}
