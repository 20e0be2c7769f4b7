// 出力ポート
// ドメイン層が外部に依存する機能をトレイトとして定義
// アダプター層でこれらのトレイトを実装する

use crate::domain::error::DomainError;
use crate::domain::model::{
    DailyCap, DayDate, ItemQuantity, Order, OrderId, ProductId, ProductStock, SlotId, TimeOfDay,
    TimeSlot,
};
use async_trait::async_trait;
use std::collections::HashMap;
use uuid::Uuid;

/// ログレベル
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

/// ロガートレイト
/// ログ出力を抽象化するポート
pub trait Logger: Send + Sync {
    /// デバッグレベルのログを出力
    fn debug(
        &self,
        component: &str,
        message: &str,
        correlation_id: Option<Uuid>,
        context: Option<HashMap<String, String>>,
    );

    /// 情報レベルのログを出力
    fn info(
        &self,
        component: &str,
        message: &str,
        correlation_id: Option<Uuid>,
        context: Option<HashMap<String, String>>,
    );

    /// 警告レベルのログを出力
    fn warn(
        &self,
        component: &str,
        message: &str,
        correlation_id: Option<Uuid>,
        context: Option<HashMap<String, String>>,
    );

    /// エラーレベルのログを出力
    fn error(
        &self,
        component: &str,
        message: &str,
        correlation_id: Option<Uuid>,
        context: Option<HashMap<String, String>>,
    );
}

/// 時計トレイト
/// 現在日時の取得を抽象化するポート（検索カットオフの判定に使用）
pub trait Clock: Send + Sync {
    /// 今日の営業日を取得
    fn today(&self) -> DayDate;

    /// 現在時刻を取得
    fn time_of_day(&self) -> TimeOfDay;
}

/// リポジトリエラー型
/// リポジトリ操作で発生するエラーを表現する
#[derive(Debug, Clone, PartialEq)]
#[allow(clippy::enum_variant_names)]
pub enum RepositoryError {
    /// データベース接続に失敗
    ConnectionFailed(String),
    /// 操作に失敗
    OperationFailed(String),
    /// データの取得に失敗
    FetchFailed(String),
}

impl std::fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepositoryError::ConnectionFailed(msg) => write!(f, "Connection failed: {}", msg),
            RepositoryError::OperationFailed(msg) => write!(f, "Operation failed: {}", msg),
            RepositoryError::FetchFailed(msg) => write!(f, "Fetch failed: {}", msg),
        }
    }
}

impl std::error::Error for RepositoryError {}

/// アトミックな予約操作のエラー型
/// ビジネスルール違反とインフラ障害を区別する
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    /// ビジネスルール違反（上限超過、在庫不足など）
    #[error(transparent)]
    Domain(#[from] DomainError),
    /// インフラ障害
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// タイムスロットリポジトリトレイト
/// タイムスロット集約の永続化を抽象化する
#[async_trait]
pub trait SlotRepository: Send + Sync {
    /// スロットをまとめて保存する
    ///
    /// # Arguments
    /// * `slots` - 保存するスロットのリスト
    ///
    /// # Returns
    /// * `Ok(())` - 保存成功
    /// * `Err(RepositoryError)` - 保存失敗
    async fn insert_slots(&self, slots: &[TimeSlot]) -> Result<(), RepositoryError>;

    /// 指定した営業日のスロットを取得する
    /// 開始時刻の昇順で並べて返す
    ///
    /// # Arguments
    /// * `date` - 営業日
    ///
    /// # Returns
    /// * `Ok(Vec<TimeSlot>)` - スロットのリスト
    /// * `Err(RepositoryError)` - 取得失敗
    async fn find_by_date(&self, date: DayDate) -> Result<Vec<TimeSlot>, RepositoryError>;

    /// 複数スロットにユニットを予約する
    /// 全スロットを検証してから更新する。1つでも失敗したら
    /// どのスロットも変更されない（全か無か）
    ///
    /// # Arguments
    /// * `slot_ids` - 予約対象のスロットID
    /// * `units_per_slot` - 各スロットに予約するユニット数
    ///
    /// # Returns
    /// * `Ok(())` - 全スロットの予約成功
    /// * `Err(StoreError::Domain(SlotNotFound))` - スロットが存在しない
    /// * `Err(StoreError::Domain(SlotFull))` - 容量超過
    /// * `Err(StoreError::Repository)` - インフラ障害
    async fn book_units(&self, slot_ids: &[SlotId], units_per_slot: u32)
        -> Result<(), StoreError>;

    /// 複数スロットの予約を解放する（補償操作）
    /// 予約数は0未満にはならない。存在しないスロットは読み飛ばす
    async fn release_units(
        &self,
        slot_ids: &[SlotId],
        units_per_slot: u32,
    ) -> Result<(), RepositoryError>;

    /// 指定した営業日のスロットをすべて削除する
    ///
    /// # Returns
    /// * `Ok(u64)` - 削除したスロット数
    async fn delete_by_date(&self, date: DayDate) -> Result<u64, RepositoryError>;

    /// 新しい一意のスロットIDを生成する
    fn next_identity(&self) -> SlotId;
}

/// 日次上限リポジトリトレイト
/// 日次上限集約の永続化を抽象化する
#[async_trait]
pub trait DailyCapRepository: Send + Sync {
    /// 指定した営業日の上限からユニットを予約する
    /// レコードが存在しない場合は `default_limit` で初期化してから予約する。
    /// 検証と更新はアトミックに行う
    ///
    /// # Arguments
    /// * `date` - 営業日
    /// * `units` - 予約するユニット数
    /// * `default_limit` - レコードが存在しない場合に使う上限
    ///
    /// # Returns
    /// * `Ok(())` - 予約成功
    /// * `Err(StoreError::Domain(DailyCapExceeded))` - 上限超過
    /// * `Err(StoreError::Repository)` - インフラ障害
    async fn reserve(&self, date: DayDate, units: u32, default_limit: u32)
        -> Result<(), StoreError>;

    /// 予約済みユニットを解放する（補償操作）
    /// 確定数は0未満にはならない。レコードが存在しない場合は何もしない
    async fn release(&self, date: DayDate, units: u32) -> Result<(), RepositoryError>;

    /// 上限を変更する（管理者操作）
    /// 確定済み数には触れない。レコードが存在しない場合は作成する
    async fn set_limit(&self, date: DayDate, limit: u32) -> Result<(), RepositoryError>;

    /// 指定した営業日の上限を取得する
    ///
    /// # Returns
    /// * `Ok(Some(DailyCap))` - レコードが存在する
    /// * `Ok(None)` - レコードが存在しない
    async fn get(&self, date: DayDate) -> Result<Option<DailyCap>, RepositoryError>;
}

/// 商品在庫リポジトリトレイト
/// 商品在庫集約の永続化を抽象化する
#[async_trait]
pub trait StockRepository: Send + Sync {
    /// 複数商品の在庫をまとめて引き落とす
    /// 全商品を検証してから更新する。1つでも失敗したら
    /// どの商品の在庫も変更されない（全か無か）
    ///
    /// # Arguments
    /// * `items` - 商品ごとの引き落とし数量
    ///
    /// # Returns
    /// * `Ok(())` - 全商品の引き落とし成功
    /// * `Err(StoreError::Domain(ProductNotFound))` - 商品が存在しない
    /// * `Err(StoreError::Domain(InsufficientStock))` - 在庫不足
    /// * `Err(StoreError::Repository)` - インフラ障害
    async fn decrement_all(&self, items: &[ItemQuantity]) -> Result<(), StoreError>;

    /// 複数商品の在庫をまとめて戻す（補償操作）
    async fn increment_all(&self, items: &[ItemQuantity]) -> Result<(), RepositoryError>;

    /// 商品在庫を保存する
    async fn save(&self, stock: &ProductStock) -> Result<(), RepositoryError>;

    /// 商品IDで在庫を検索する
    ///
    /// # Returns
    /// * `Ok(Some(ProductStock))` - 在庫が見つかった
    /// * `Ok(None)` - 在庫が見つからなかった
    async fn find_by_product_id(
        &self,
        product_id: ProductId,
    ) -> Result<Option<ProductStock>, RepositoryError>;

    /// すべての商品在庫を取得する
    /// 商品IDの昇順で並べて返す
    async fn find_all(&self) -> Result<Vec<ProductStock>, RepositoryError>;
}

/// 注文リポジトリトレイト
/// 注文集約の永続化を抽象化する
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// 注文を保存する
    ///
    /// # Arguments
    /// * `order` - 保存する注文
    ///
    /// # Returns
    /// * `Ok(())` - 保存成功
    /// * `Err(RepositoryError)` - 保存失敗
    async fn save(&self, order: &Order) -> Result<(), RepositoryError>;

    /// 注文IDで注文を検索する
    ///
    /// # Returns
    /// * `Ok(Some(Order))` - 注文が見つかった
    /// * `Ok(None)` - 注文が見つからなかった
    async fn find_by_id(&self, order_id: OrderId) -> Result<Option<Order>, RepositoryError>;

    /// すべての注文を取得する
    /// 営業日の降順（新しい日が先）、受け渡し時刻の昇順で並べて返す
    async fn find_all(&self) -> Result<Vec<Order>, RepositoryError>;

    /// 指定した営業日の注文を取得する
    /// 受け渡し時刻の昇順で並べて返す
    async fn find_by_date(&self, date: DayDate) -> Result<Vec<Order>, RepositoryError>;

    /// 注文を削除する
    ///
    /// # Returns
    /// * `Ok(true)` - 削除した
    /// * `Ok(false)` - 注文が存在しなかった
    async fn delete(&self, order_id: OrderId) -> Result<bool, RepositoryError>;

    /// 新しい一意の注文IDを生成する
    fn next_identity(&self) -> OrderId;
}
