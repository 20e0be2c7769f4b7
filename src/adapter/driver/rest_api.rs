use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use uuid::Uuid;

use crate::adapter::driven::{MySqlSlotRepository, MySqlStockRepository, SystemClock};
use crate::adapter::driver::request_dto::{
    AvailabilityQueryParams, CreateSlotsRequest, CreateStockRequest, OrdersQueryParams,
    PlaceOrderRequest, SetDailyLimitRequest,
};
use crate::adapter::driver::response_dto::{
    DailyCapResponse, DeliveryWindowResponse, OrderDetailResponse, OrderSummaryResponse,
    SlotResponse, StockResponse,
};
use crate::application::service::{
    CapacityApplicationService, OrderApplicationService, OrderQueryService, PlaceOrderCommand,
    ReservationApplicationService, ScheduleApplicationService,
};
use crate::application::ApplicationError;
use crate::domain::model::{
    DayDate, DeliveryType, ItemQuantity, Money, OrderId, PaymentMethod, ProductId, ProductStock,
    SlotId, TimeOfDay,
};
use crate::domain::port::StockRepository;
use crate::domain::service::AvailabilityService;

// REST API用のレスポンスDTO
#[derive(Serialize, Deserialize)]
pub struct PlaceOrderResponse {
    pub order_id: Uuid,
}

#[derive(Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

// アプリケーションサービスを含む状態
pub type AppState = AppStateInner;

#[derive(Clone)]
pub struct AppStateInner {
    pub reservation_service: Arc<ReservationApplicationService>,
    pub schedule_service: Arc<ScheduleApplicationService>,
    pub capacity_service: Arc<CapacityApplicationService>,
    pub order_service: Arc<OrderApplicationService>,
    pub order_query_service: Arc<OrderQueryService>,
    pub availability_service: Arc<AvailabilityService<MySqlSlotRepository, SystemClock>>,
    pub stock_repository: Arc<MySqlStockRepository>,
}

// REST APIルーターを作成
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/schedule/:date/slots", post(create_slots))
        .route("/schedule/:date/slots", get(get_slots))
        .route("/schedule/:date/regenerate", post(regenerate_slots))
        .route("/availability", get(get_availability))
        .route("/daily-cap/:date", get(get_daily_cap))
        .route("/daily-cap/:date/limit", put(set_daily_limit))
        .route("/orders", post(place_order))
        .route("/orders", get(get_orders))
        .route("/orders/:order_id", get(get_order_by_id))
        .route("/orders/:order_id", delete(delete_order))
        .route("/orders/:order_id/sent", post(mark_order_as_sent))
        .route("/stock", post(create_stock))
        .route("/stock", get(get_stocks))
        .route("/stock/:product_id", get(get_stock_by_product_id))
}

// ヘルスチェックエンドポイント
async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "pizzeria-order-management",
        "version": "0.1.0"
    }))
}

// スロット生成エンドポイント
async fn create_slots(
    State(state): State<AppState>,
    Path(date): Path<String>,
    Json(request): Json<CreateSlotsRequest>,
) -> Result<(StatusCode, Json<Vec<SlotResponse>>), (StatusCode, Json<ApiError>)> {
    let date = parse_date(&date)?;
    let start = parse_time(&request.start_time)?;
    let end = parse_time(&request.end_time)?;

    match state
        .schedule_service
        .create_slots(date, start, end, request.interval_minutes, request.units_per_slot)
        .await
    {
        Ok(slots) => {
            let response: Vec<SlotResponse> = slots.iter().map(SlotResponse::from_slot).collect();
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(err) => Err(map_application_error(err)),
    }
}

// スロット一覧取得エンドポイント
async fn get_slots(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<Vec<SlotResponse>>, (StatusCode, Json<ApiError>)> {
    let date = parse_date(&date)?;

    match state.schedule_service.list_slots(date).await {
        Ok(slots) => {
            let response: Vec<SlotResponse> = slots.iter().map(SlotResponse::from_slot).collect();
            Ok(Json(response))
        }
        Err(err) => Err(map_application_error(err)),
    }
}

// スロット再生成エンドポイント
// 既存のスロットと予約数は失われる
async fn regenerate_slots(
    State(state): State<AppState>,
    Path(date): Path<String>,
    Json(request): Json<CreateSlotsRequest>,
) -> Result<(StatusCode, Json<Vec<SlotResponse>>), (StatusCode, Json<ApiError>)> {
    let date = parse_date(&date)?;
    let start = parse_time(&request.start_time)?;
    let end = parse_time(&request.end_time)?;

    match state
        .schedule_service
        .regenerate_slots(date, start, end, request.interval_minutes, request.units_per_slot)
        .await
    {
        Ok(slots) => {
            let response: Vec<SlotResponse> = slots.iter().map(SlotResponse::from_slot).collect();
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(err) => Err(map_application_error(err)),
    }
}

// 空き時間帯検索エンドポイント
async fn get_availability(
    State(state): State<AppState>,
    query: Result<Query<AvailabilityQueryParams>, axum::extract::rejection::QueryRejection>,
) -> Result<Json<Vec<DeliveryWindowResponse>>, (StatusCode, Json<ApiError>)> {
    let Query(params) = query.map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                error: "無効なクエリパラメータです".to_string(),
                code: "INVALID_PARAMETER".to_string(),
            }),
        )
    })?;
    let date = parse_date(&params.date)?;
    if params.units == 0 {
        return Err(map_domain_error(
            crate::domain::error::DomainError::InvalidQuantity,
        ));
    }

    match state.availability_service.search(date, params.units).await {
        Ok(windows) => {
            let response: Vec<DeliveryWindowResponse> = windows
                .iter()
                .map(DeliveryWindowResponse::from_window)
                .collect();
            Ok(Json(response))
        }
        Err(err) => Err(map_application_error(ApplicationError::from(err))),
    }
}

// 日次上限取得エンドポイント
async fn get_daily_cap(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<DailyCapResponse>, (StatusCode, Json<ApiError>)> {
    let date = parse_date(&date)?;

    match state.capacity_service.get_cap(date).await {
        Ok(cap) => Ok(Json(DailyCapResponse::from_cap(&cap))),
        Err(err) => Err(map_application_error(err)),
    }
}

// 日次上限変更エンドポイント
async fn set_daily_limit(
    State(state): State<AppState>,
    Path(date): Path<String>,
    Json(request): Json<SetDailyLimitRequest>,
) -> Result<StatusCode, (StatusCode, Json<ApiError>)> {
    let date = parse_date(&date)?;

    match state.capacity_service.set_limit(date, request.limit).await {
        Ok(()) => Ok(StatusCode::OK),
        Err(err) => Err(map_application_error(err)),
    }
}

// 注文確定エンドポイント
async fn place_order(
    State(state): State<AppState>,
    Json(request): Json<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<PlaceOrderResponse>), (StatusCode, Json<ApiError>)> {
    let order_date = parse_date(&request.order_date)?;
    let delivery_time = parse_time(&request.delivery_time)?;

    let mut items = Vec::with_capacity(request.items.len());
    for item in &request.items {
        let item = ItemQuantity::new(ProductId::from_uuid(item.product_id), item.quantity)
            .map_err(map_domain_error)?;
        items.push(item);
    }

    let total =
        Money::new(request.total_amount, request.total_currency).map_err(map_domain_error)?;
    let payment_method =
        PaymentMethod::from_string(&request.payment_method).map_err(map_domain_error)?;
    let delivery_type =
        DeliveryType::from_string(&request.delivery_type).map_err(map_domain_error)?;

    let command = PlaceOrderCommand {
        customer_name: request.customer_name,
        summary: request.summary,
        order_date,
        items,
        slot_ids: request.slot_ids.into_iter().map(SlotId::from_uuid).collect(),
        delivery_time,
        total,
        payment_method,
        delivery_type,
    };

    match state.reservation_service.place_order(command).await {
        Ok(order_id) => Ok((
            StatusCode::CREATED,
            Json(PlaceOrderResponse {
                order_id: order_id.as_uuid(),
            }),
        )),
        Err(err) => Err(map_application_error(err)),
    }
}

// 注文一覧取得エンドポイント
async fn get_orders(
    State(state): State<AppState>,
    query: Result<Query<OrdersQueryParams>, axum::extract::rejection::QueryRejection>,
) -> Result<Json<Vec<OrderSummaryResponse>>, (StatusCode, Json<ApiError>)> {
    let Query(params) = query.map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                error: "無効なクエリパラメータです".to_string(),
                code: "INVALID_PARAMETER".to_string(),
            }),
        )
    })?;

    let orders = if let Some(date_str) = params.date {
        // 営業日でフィルタリング
        let date = parse_date(&date_str)?;
        match state.order_query_service.get_orders_by_date(date).await {
            Ok(orders) => orders,
            Err(err) => return Err(map_application_error(err)),
        }
    } else {
        // 全注文を取得
        match state.order_query_service.get_all_orders().await {
            Ok(orders) => orders,
            Err(err) => return Err(map_application_error(err)),
        }
    };

    let response: Vec<OrderSummaryResponse> = orders
        .iter()
        .map(OrderSummaryResponse::from_order)
        .collect();

    Ok(Json(response))
}

// 注文詳細取得エンドポイント
async fn get_order_by_id(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<OrderDetailResponse>, (StatusCode, Json<ApiError>)> {
    let order_id = OrderId::from_uuid(order_id);

    match state.order_query_service.get_order_by_id(order_id).await {
        Ok(Some(order)) => Ok(Json(OrderDetailResponse::from_order(&order))),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(ApiError {
                error: "指定された注文が見つかりません".to_string(),
                code: "ORDER_NOT_FOUND".to_string(),
            }),
        )),
        Err(err) => Err(map_application_error(err)),
    }
}

// 注文発送済みマークエンドポイント
async fn mark_order_as_sent(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, Json<ApiError>)> {
    let order_id = OrderId::from_uuid(order_id);

    match state.order_service.mark_order_as_sent(order_id).await {
        Ok(()) => Ok(StatusCode::OK),
        Err(err) => Err(map_application_error(err)),
    }
}

// 注文削除エンドポイント
async fn delete_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, Json<ApiError>)> {
    let order_id = OrderId::from_uuid(order_id);

    match state.order_service.delete_order(order_id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(err) => Err(map_application_error(err)),
    }
}

// 在庫登録エンドポイント（テスト用）
async fn create_stock(
    State(state): State<AppState>,
    Json(request): Json<CreateStockRequest>,
) -> Result<StatusCode, (StatusCode, Json<ApiError>)> {
    let stock = ProductStock::new(ProductId::from_uuid(request.product_id), request.stock);

    // 在庫リポジトリに直接保存（本来はアプリケーションサービス経由が望ましい）
    match state.stock_repository.save(&stock).await {
        Ok(()) => Ok(StatusCode::CREATED),
        Err(err) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiError {
                error: format!("{}", err),
                code: "REPOSITORY_ERROR".to_string(),
            }),
        )),
    }
}

// 在庫一覧取得エンドポイント
async fn get_stocks(
    State(state): State<AppState>,
) -> Result<Json<Vec<StockResponse>>, (StatusCode, Json<ApiError>)> {
    match state.stock_repository.find_all().await {
        Ok(stocks) => {
            let response: Vec<StockResponse> =
                stocks.iter().map(StockResponse::from_stock).collect();
            Ok(Json(response))
        }
        Err(err) => Err(map_application_error(ApplicationError::from(err))),
    }
}

// 在庫詳細取得エンドポイント
async fn get_stock_by_product_id(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<Json<StockResponse>, (StatusCode, Json<ApiError>)> {
    let product_id = ProductId::from_uuid(product_id);

    match state.stock_repository.find_by_product_id(product_id).await {
        Ok(Some(stock)) => Ok(Json(StockResponse::from_stock(&stock))),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(ApiError {
                error: "指定された商品の在庫が見つかりません".to_string(),
                code: "STOCK_NOT_FOUND".to_string(),
            }),
        )),
        Err(err) => Err(map_application_error(ApplicationError::from(err))),
    }
}

// `YYYY-MM-DD` 形式のパスパラメータを解析
fn parse_date(s: &str) -> Result<DayDate, (StatusCode, Json<ApiError>)> {
    DayDate::from_string(s).map_err(map_domain_error)
}

// `HH:MM` 形式のリクエストフィールドを解析
fn parse_time(s: &str) -> Result<TimeOfDay, (StatusCode, Json<ApiError>)> {
    TimeOfDay::from_string(s).map_err(map_domain_error)
}

// アプリケーションエラーをHTTPエラーにマッピング
fn map_application_error(err: ApplicationError) -> (StatusCode, Json<ApiError>) {
    match err {
        ApplicationError::DomainError(domain_err) => map_domain_error(domain_err),
        ApplicationError::RepositoryError(repo_err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiError {
                error: format!("{}", repo_err),
                code: "REPOSITORY_ERROR".to_string(),
            }),
        ),
        ApplicationError::NotFound(msg) => (
            StatusCode::NOT_FOUND,
            Json(ApiError {
                error: msg,
                code: "NOT_FOUND".to_string(),
            }),
        ),
    }
}

// ドメインエラーを適切なHTTPステータスコードとエラーコードにマッピング
// ビジネスルール違反のうち、他の注文との競合によるものは409を返す
fn map_domain_error(domain_err: crate::domain::error::DomainError) -> (StatusCode, Json<ApiError>) {
    use crate::domain::error::DomainError;

    match domain_err {
        DomainError::InvalidRange(msg) => (
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                error: msg,
                code: "INVALID_RANGE".to_string(),
            }),
        ),
        DomainError::InvalidQuantity => (
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                error: "無効な数量です".to_string(),
                code: "INVALID_QUANTITY".to_string(),
            }),
        ),
        DomainError::InvalidValue(msg) => (
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                error: msg,
                code: "INVALID_VALUE".to_string(),
            }),
        ),
        DomainError::SlotNotFound(slot_id) => (
            StatusCode::NOT_FOUND,
            Json(ApiError {
                error: format!("スロットが見つかりません: {}", slot_id),
                code: "SLOT_NOT_FOUND".to_string(),
            }),
        ),
        DomainError::ProductNotFound(product_id) => (
            StatusCode::NOT_FOUND,
            Json(ApiError {
                error: format!("商品が見つかりません: {}", product_id),
                code: "PRODUCT_NOT_FOUND".to_string(),
            }),
        ),
        DomainError::DailyCapExceeded { remaining } => (
            StatusCode::CONFLICT,
            Json(ApiError {
                error: format!("日次上限を超過しています（残り{}ユニット）", remaining),
                code: "DAILY_CAP_EXCEEDED".to_string(),
            }),
        ),
        DomainError::InsufficientStock {
            product_id,
            available,
            requested,
        } => (
            StatusCode::CONFLICT,
            Json(ApiError {
                error: format!(
                    "在庫不足です: 商品{}（在庫{}、要求{}）",
                    product_id, available, requested
                ),
                code: "INSUFFICIENT_STOCK".to_string(),
            }),
        ),
        DomainError::SlotFull(slot_id) => (
            StatusCode::CONFLICT,
            Json(ApiError {
                error: format!("スロットは満席です: {}", slot_id),
                code: "SLOT_FULL".to_string(),
            }),
        ),
    }
}
