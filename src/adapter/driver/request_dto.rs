use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// スロット生成用のリクエストDTO
#[derive(Serialize, Deserialize)]
pub struct CreateSlotsRequest {
    pub start_time: String,
    pub end_time: String,
    pub interval_minutes: u16,
    pub units_per_slot: u32,
}

/// 日次上限変更用のリクエストDTO
#[derive(Serialize, Deserialize)]
pub struct SetDailyLimitRequest {
    pub limit: u32,
}

/// 注文明細用のリクエストDTO
#[derive(Serialize, Deserialize)]
pub struct OrderItemRequest {
    pub product_id: Uuid,
    pub quantity: u32,
}

/// 注文確定用のリクエストDTO
/// 空き時間帯検索で得たスロットIDを指定する
#[derive(Serialize, Deserialize)]
pub struct PlaceOrderRequest {
    pub customer_name: String,
    pub summary: String,
    pub order_date: String,
    pub items: Vec<OrderItemRequest>,
    pub slot_ids: Vec<Uuid>,
    pub delivery_time: String,
    pub total_amount: i64,
    pub total_currency: String,
    pub payment_method: String,
    pub delivery_type: String,
}

/// 在庫登録用のリクエストDTO
#[derive(Serialize, Deserialize)]
pub struct CreateStockRequest {
    pub product_id: Uuid,
    pub stock: u32,
}

/// 空き時間帯検索用のクエリパラメータ
#[derive(Deserialize)]
pub struct AvailabilityQueryParams {
    pub date: String,
    pub units: u32,
}

/// 注文一覧取得用のクエリパラメータ
#[derive(Deserialize)]
pub struct OrdersQueryParams {
    pub date: Option<String>,
}
