use pizzeria_order_management::adapter::driven::{
    ConsoleLogger, MySqlDailyCapRepository, MySqlOrderRepository, MySqlSlotRepository,
    MySqlStockRepository, SystemClock,
};
use pizzeria_order_management::adapter::driver::rest_api::{create_router, AppStateInner};
use pizzeria_order_management::adapter::{DatabaseConfig, DatabaseMigration};
use pizzeria_order_management::application::service::{
    CapacityApplicationService, OrderApplicationService, OrderQueryService,
    ReservationApplicationService, ScheduleApplicationService,
};
use pizzeria_order_management::domain::model::DEFAULT_DAILY_LIMIT;
use pizzeria_order_management::domain::service::AvailabilityService;

use sqlx::mysql::MySqlPoolOptions;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== ピッツェリア注文管理システム REST API ===");
    println!();

    // .envファイルから環境変数を読み込む
    dotenvy::dotenv().ok();

    // データベース設定を読み込む
    let config = DatabaseConfig::from_env()?;
    println!(
        "データベース設定を読み込みました: {}:{}",
        config.host, config.port
    );

    // 接続プールを作成
    let pool = MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.connection_string())
        .await?;
    println!("データベース接続プールを作成しました");

    // マイグレーションを実行
    let migration = DatabaseMigration::new(pool.clone());
    migration.run().await?;
    println!("データベースマイグレーションを実行しました");

    // MySQLリポジトリを作成
    let slot_repository = Arc::new(MySqlSlotRepository::new(pool.clone()));
    let daily_cap_repository = Arc::new(MySqlDailyCapRepository::new(pool.clone()));
    let stock_repository = Arc::new(MySqlStockRepository::new(pool.clone()));
    let order_repository = Arc::new(MySqlOrderRepository::new(pool.clone()));

    // ロガーを作成
    let logger = Arc::new(ConsoleLogger::new());

    // 日次上限のデフォルト値（環境変数で上書き可能）
    let default_daily_limit = std::env::var("PIZZERIA_DAILY_LIMIT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_DAILY_LIMIT);
    println!("日次上限のデフォルト値: {}", default_daily_limit);

    // アプリケーションサービスを作成
    let reservation_service = ReservationApplicationService::new(
        slot_repository.clone(),
        daily_cap_repository.clone(),
        stock_repository.clone(),
        order_repository.clone(),
        logger.clone(),
        default_daily_limit,
    );
    let schedule_service = ScheduleApplicationService::new(slot_repository.clone(), logger.clone());
    let capacity_service = CapacityApplicationService::new(
        daily_cap_repository.clone(),
        logger.clone(),
        default_daily_limit,
    );
    let order_service = OrderApplicationService::new(order_repository.clone(), logger.clone());
    let order_query_service = OrderQueryService::new(order_repository.clone());

    // 空き時間帯検索サービスを作成（専用の接続を持たせる）
    let availability_service = AvailabilityService::new(
        MySqlSlotRepository::new(pool.clone()),
        SystemClock::new(),
    );

    // アプリケーション状態を作成
    let app_state = AppStateInner {
        reservation_service: Arc::new(reservation_service),
        schedule_service: Arc::new(schedule_service),
        capacity_service: Arc::new(capacity_service),
        order_service: Arc::new(order_service),
        order_query_service: Arc::new(order_query_service),
        availability_service: Arc::new(availability_service),
        stock_repository,
    };

    // REST APIルーターを作成
    let app = create_router()
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // サーバーを起動
    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    println!("REST APIサーバーが起動しました: http://localhost:3000");
    println!("ヘルスチェック: GET http://localhost:3000/health");
    println!("API仕様:");
    println!("  POST   /schedule/:date/slots - スロット生成");
    println!("  GET    /schedule/:date/slots - スロット一覧取得");
    println!("  POST   /schedule/:date/regenerate - スロット再生成");
    println!("  GET    /availability?date=&units= - 空き時間帯検索");
    println!("  GET    /daily-cap/:date - 日次上限取得");
    println!("  PUT    /daily-cap/:date/limit - 日次上限変更");
    println!("  POST   /orders - 注文確定");
    println!("  GET    /orders - 注文一覧取得");
    println!("  GET    /orders/:id - 注文詳細取得");
    println!("  POST   /orders/:id/sent - 注文発送済みマーク");
    println!("  DELETE /orders/:id - 注文削除");
    println!("  POST   /stock - 在庫登録（テスト用）");
    println!("  GET    /stock - 在庫一覧取得");
    println!("  GET    /stock/:product_id - 在庫詳細取得");
    println!();

    axum::serve(listener, app).await?;

    Ok(())
}
