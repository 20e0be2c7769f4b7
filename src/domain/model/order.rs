use crate::domain::error::DomainError;
use crate::domain::model::{DayDate, DeliveryType, Money, OrderId, PaymentMethod, TimeOfDay};

/// 注文集約
/// 確定した予約の記録。キャパシティの引き当てはスロット・日次上限・在庫側で管理する
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    id: OrderId,
    customer_name: String,
    summary: String,
    delivery_time: TimeOfDay,
    total: Money,
    payment_method: PaymentMethod,
    delivery_type: DeliveryType,
    order_date: DayDate,
    pizza_units: u32,
    sent: bool,
}

impl Order {
    /// 新しい注文を作成
    ///
    /// # Arguments
    /// * `id` - 注文ID
    /// * `customer_name` - 顧客名（空文字は不可）
    /// * `summary` - 注文内容の概要
    /// * `delivery_time` - 受け渡し時刻
    /// * `total` - 合計金額
    /// * `payment_method` - 支払い方法
    /// * `delivery_type` - 受け渡し方法
    /// * `order_date` - 営業日
    /// * `pizza_units` - 注文に含まれる総ユニット数（1以上）
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: OrderId,
        customer_name: String,
        summary: String,
        delivery_time: TimeOfDay,
        total: Money,
        payment_method: PaymentMethod,
        delivery_type: DeliveryType,
        order_date: DayDate,
        pizza_units: u32,
    ) -> Result<Self, DomainError> {
        if customer_name.trim().is_empty() {
            return Err(DomainError::InvalidValue(
                "顧客名は空にできません".to_string(),
            ));
        }
        if pizza_units == 0 {
            return Err(DomainError::InvalidQuantity);
        }
        Ok(Self {
            id,
            customer_name,
            summary,
            delivery_time,
            total,
            payment_method,
            delivery_type,
            order_date,
            pizza_units,
            sent: false,
        })
    }

    /// データベースから取得したデータで注文を再構築
    #[allow(clippy::too_many_arguments)]
    pub fn reconstruct(
        id: OrderId,
        customer_name: String,
        summary: String,
        delivery_time: TimeOfDay,
        total: Money,
        payment_method: PaymentMethod,
        delivery_type: DeliveryType,
        order_date: DayDate,
        pizza_units: u32,
        sent: bool,
    ) -> Self {
        Self {
            id,
            customer_name,
            summary,
            delivery_time,
            total,
            payment_method,
            delivery_type,
            order_date,
            pizza_units,
            sent,
        }
    }

    /// 注文IDを取得
    pub fn id(&self) -> OrderId {
        self.id
    }

    /// 顧客名を取得
    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    /// 注文概要を取得
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// 受け渡し時刻を取得
    pub fn delivery_time(&self) -> TimeOfDay {
        self.delivery_time
    }

    /// 合計金額を取得
    pub fn total(&self) -> Money {
        self.total
    }

    /// 支払い方法を取得
    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    /// 受け渡し方法を取得
    pub fn delivery_type(&self) -> DeliveryType {
        self.delivery_type
    }

    /// 営業日を取得
    pub fn order_date(&self) -> DayDate {
        self.order_date
    }

    /// 総ユニット数を取得
    pub fn pizza_units(&self) -> u32 {
        self.pizza_units
    }

    /// 発送済み（受け渡し済み）かどうか
    pub fn is_sent(&self) -> bool {
        self.sent
    }

    /// 注文を発送済みにする
    /// 冪等な操作（既に発送済みでもエラーにしない）
    pub fn mark_as_sent(&mut self) {
        self.sent = true;
    }
}
