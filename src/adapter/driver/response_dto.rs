use crate::domain::model::{DailyCap, Order, ProductStock, TimeSlot};
use crate::domain::service::DeliveryWindow;
use serde::Serialize;

/// タイムスロット用のレスポンスDTO
#[derive(Serialize)]
pub struct SlotResponse {
    pub slot_id: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub capacity: u32,
    pub booked: u32,
}

impl SlotResponse {
    /// ドメインオブジェクトからSlotResponseを作成
    pub fn from_slot(slot: &TimeSlot) -> Self {
        Self {
            slot_id: slot.id().to_string(),
            date: slot.date().to_string(),
            start_time: slot.start_time().to_string(),
            end_time: slot.end_time().to_string(),
            capacity: slot.capacity(),
            booked: slot.booked(),
        }
    }
}

/// 受け渡し可能な時間帯用のレスポンスDTO
#[derive(Serialize)]
pub struct DeliveryWindowResponse {
    pub prep_start_time: String,
    pub delivery_time: String,
    pub slot_ids: Vec<String>,
}

impl DeliveryWindowResponse {
    /// ドメインオブジェクトからDeliveryWindowResponseを作成
    pub fn from_window(window: &DeliveryWindow) -> Self {
        Self {
            prep_start_time: window.prep_start_time.to_string(),
            delivery_time: window.delivery_time.to_string(),
            slot_ids: window.slot_ids.iter().map(|id| id.to_string()).collect(),
        }
    }
}

/// 日次上限用のレスポンスDTO
#[derive(Serialize)]
pub struct DailyCapResponse {
    pub date: String,
    pub limit: u32,
    pub ordered: u32,
    pub remaining: u32,
}

impl DailyCapResponse {
    /// ドメインオブジェクトからDailyCapResponseを作成
    pub fn from_cap(cap: &DailyCap) -> Self {
        Self {
            date: cap.date().to_string(),
            limit: cap.limit(),
            ordered: cap.ordered(),
            remaining: cap.remaining(),
        }
    }
}

/// 注文一覧用のレスポンスDTO
#[derive(Serialize)]
pub struct OrderSummaryResponse {
    pub order_id: String,
    pub customer_name: String,
    pub order_date: String,
    pub delivery_time: String,
    pub pizza_units: u32,
    pub sent: bool,
}

impl OrderSummaryResponse {
    /// ドメインオブジェクトからOrderSummaryResponseを作成
    pub fn from_order(order: &Order) -> Self {
        Self {
            order_id: order.id().to_string(),
            customer_name: order.customer_name().to_string(),
            order_date: order.order_date().to_string(),
            delivery_time: order.delivery_time().to_string(),
            pizza_units: order.pizza_units(),
            sent: order.is_sent(),
        }
    }
}

/// 注文詳細用のレスポンスDTO
#[derive(Serialize)]
pub struct OrderDetailResponse {
    pub order_id: String,
    pub customer_name: String,
    pub summary: String,
    pub order_date: String,
    pub delivery_time: String,
    pub total_amount: i64,
    pub total_currency: String,
    pub payment_method: String,
    pub delivery_type: String,
    pub pizza_units: u32,
    pub sent: bool,
}

impl OrderDetailResponse {
    /// ドメインオブジェクトからOrderDetailResponseを作成
    pub fn from_order(order: &Order) -> Self {
        Self {
            order_id: order.id().to_string(),
            customer_name: order.customer_name().to_string(),
            summary: order.summary().to_string(),
            order_date: order.order_date().to_string(),
            delivery_time: order.delivery_time().to_string(),
            total_amount: order.total().amount(),
            total_currency: order.total().currency(),
            payment_method: order.payment_method().to_string(),
            delivery_type: order.delivery_type().to_string(),
            pizza_units: order.pizza_units(),
            sent: order.is_sent(),
        }
    }
}

/// 商品在庫用のレスポンスDTO
#[derive(Serialize)]
pub struct StockResponse {
    pub product_id: String,
    pub stock: u32,
}

impl StockResponse {
    /// ドメインオブジェクトからStockResponseを作成
    pub fn from_stock(stock: &ProductStock) -> Self {
        Self {
            product_id: stock.product_id().to_string(),
            stock: stock.stock(),
        }
    }
}
