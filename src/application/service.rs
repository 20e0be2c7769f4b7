pub mod order_query_service;

pub use order_query_service::OrderQueryService;

use crate::application::ApplicationError;
use crate::domain::error::DomainError;
use crate::domain::model::{
    generate_slots, DailyCap, DayDate, DeliveryType, ItemQuantity, Money, Order, OrderId,
    PaymentMethod, SlotId, TimeOfDay, TimeSlot,
};
use crate::domain::port::{
    DailyCapRepository, Logger, OrderRepository, SlotRepository, StockRepository,
};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// 注文確定コマンド
/// 顧客が空き時間帯を選択した後の確定リクエスト
#[derive(Debug, Clone)]
pub struct PlaceOrderCommand {
    pub customer_name: String,
    pub summary: String,
    pub order_date: DayDate,
    pub items: Vec<ItemQuantity>,
    pub slot_ids: Vec<SlotId>,
    pub delivery_time: TimeOfDay,
    pub total: Money,
    pub payment_method: PaymentMethod,
    pub delivery_type: DeliveryType,
}

/// 実行済みステップを巻き戻すための補償操作
/// 予約が途中で失敗した場合、逆順に実行される
#[derive(Debug, Clone)]
enum CompensationStep {
    ReleaseDailyCap { date: DayDate, units: u32 },
    RestoreStock(Vec<ItemQuantity>),
    ReleaseSlots(Vec<SlotId>),
}

/// 予約アプリケーションサービス
/// 注文確定のオーケストレーションを担当する。
/// 日次上限→在庫→スロットの順に引き当て、途中で失敗したら
/// 成功済みのステップを逆順に巻き戻す
pub struct ReservationApplicationService {
    slot_repository: Arc<dyn SlotRepository>,
    daily_cap_repository: Arc<dyn DailyCapRepository>,
    stock_repository: Arc<dyn StockRepository>,
    order_repository: Arc<dyn OrderRepository>,
    logger: Arc<dyn Logger>,
    default_daily_limit: u32,
}

impl ReservationApplicationService {
    /// 新しい予約アプリケーションサービスを作成
    ///
    /// # Arguments
    /// * `slot_repository` - スロットリポジトリ
    /// * `daily_cap_repository` - 日次上限リポジトリ
    /// * `stock_repository` - 商品在庫リポジトリ
    /// * `order_repository` - 注文リポジトリ
    /// * `logger` - ロガー
    /// * `default_daily_limit` - 日次上限レコードが存在しない場合に使う上限
    pub fn new(
        slot_repository: Arc<dyn SlotRepository>,
        daily_cap_repository: Arc<dyn DailyCapRepository>,
        stock_repository: Arc<dyn StockRepository>,
        order_repository: Arc<dyn OrderRepository>,
        logger: Arc<dyn Logger>,
        default_daily_limit: u32,
    ) -> Self {
        Self {
            slot_repository,
            daily_cap_repository,
            stock_repository,
            order_repository,
            logger,
            default_daily_limit,
        }
    }

    /// 注文を確定する
    ///
    /// 引き当ては次の順で行う:
    /// 1. 日次上限からユニットを予約
    /// 2. 商品在庫を引き落とす
    /// 3. 選択されたスロットにユニットを予約
    /// 4. 注文を保存
    ///
    /// いずれかのステップが失敗した場合、成功済みのステップを
    /// 逆順に巻き戻してから元のエラーを返す
    ///
    /// # Arguments
    /// * `command` - 注文確定コマンド
    ///
    /// # Returns
    /// * `Ok(OrderId)` - 確定した注文のID
    /// * `Err(ApplicationError)` - 確定失敗（引き当ては巻き戻し済み）
    pub async fn place_order(
        &self,
        command: PlaceOrderCommand,
    ) -> Result<OrderId, ApplicationError> {
        let correlation_id = Uuid::new_v4();
        let units = Self::validate_command(&command)?;

        self.logger.info(
            "ReservationApplicationService",
            "注文の確定を開始",
            Some(correlation_id),
            Some(HashMap::from([
                ("date".to_string(), command.order_date.to_string()),
                ("units".to_string(), units.to_string()),
            ])),
        );

        let mut compensations: Vec<CompensationStep> = Vec::new();

        // ステップ1: 日次上限からユニットを予約
        if let Err(e) = self
            .daily_cap_repository
            .reserve(command.order_date, units, self.default_daily_limit)
            .await
        {
            return Err(self
                .fail_with_compensation(e.into(), compensations, correlation_id)
                .await);
        }
        compensations.push(CompensationStep::ReleaseDailyCap {
            date: command.order_date,
            units,
        });

        // ステップ2: 商品在庫を引き落とす
        if let Err(e) = self.stock_repository.decrement_all(&command.items).await {
            return Err(self
                .fail_with_compensation(e.into(), compensations, correlation_id)
                .await);
        }
        compensations.push(CompensationStep::RestoreStock(command.items.clone()));

        // ステップ3: 選択されたスロットにユニットを予約（各スロットに1ユニット）
        if let Err(e) = self.slot_repository.book_units(&command.slot_ids, 1).await {
            return Err(self
                .fail_with_compensation(e.into(), compensations, correlation_id)
                .await);
        }
        compensations.push(CompensationStep::ReleaseSlots(command.slot_ids.clone()));

        // ステップ4: 注文を保存
        let order_id = self.order_repository.next_identity();
        let order = match Order::new(
            order_id,
            command.customer_name,
            command.summary,
            command.delivery_time,
            command.total,
            command.payment_method,
            command.delivery_type,
            command.order_date,
            units,
        ) {
            Ok(order) => order,
            Err(e) => {
                return Err(self
                    .fail_with_compensation(e.into(), compensations, correlation_id)
                    .await)
            }
        };

        if let Err(e) = self.order_repository.save(&order).await {
            return Err(self
                .fail_with_compensation(e.into(), compensations, correlation_id)
                .await);
        }

        self.logger.info(
            "ReservationApplicationService",
            "注文を確定",
            Some(correlation_id),
            Some(HashMap::from([(
                "order_id".to_string(),
                order_id.to_string(),
            )])),
        );

        Ok(order_id)
    }

    /// コマンドを検証し、総ユニット数を返す
    fn validate_command(command: &PlaceOrderCommand) -> Result<u32, ApplicationError> {
        if command.customer_name.trim().is_empty() {
            return Err(DomainError::InvalidValue("顧客名は必須です".to_string()).into());
        }
        if command.items.is_empty() {
            return Err(DomainError::InvalidQuantity.into());
        }
        let units: u32 = command.items.iter().map(|i| i.quantity()).sum();
        if units == 0 {
            return Err(DomainError::InvalidQuantity.into());
        }
        if command.slot_ids.len() != units as usize {
            return Err(DomainError::InvalidValue(format!(
                "スロット数がユニット数と一致しません: {} != {}",
                command.slot_ids.len(),
                units
            ))
            .into());
        }
        Ok(units)
    }

    /// 成功済みステップを逆順に巻き戻し、元のエラーを返す
    /// 補償操作自体の失敗はログに記録するが、元のエラーを隠さない
    async fn fail_with_compensation(
        &self,
        original: ApplicationError,
        compensations: Vec<CompensationStep>,
        correlation_id: Uuid,
    ) -> ApplicationError {
        self.logger.warn(
            "ReservationApplicationService",
            &format!("注文の確定に失敗、補償を開始: {}", original),
            Some(correlation_id),
            Some(HashMap::from([(
                "steps".to_string(),
                compensations.len().to_string(),
            )])),
        );

        for step in compensations.into_iter().rev() {
            let result = match &step {
                CompensationStep::ReleaseDailyCap { date, units } => {
                    self.daily_cap_repository.release(*date, *units).await
                }
                CompensationStep::RestoreStock(items) => {
                    self.stock_repository.increment_all(items).await
                }
                CompensationStep::ReleaseSlots(slot_ids) => {
                    self.slot_repository.release_units(slot_ids, 1).await
                }
            };

            if let Err(e) = result {
                // 手動での調整が必要になるため、詳細をすべて残す
                self.logger.error(
                    "ReservationApplicationService",
                    &format!("補償操作に失敗: {}", e),
                    Some(correlation_id),
                    Some(HashMap::from([(
                        "step".to_string(),
                        format!("{:?}", step),
                    )])),
                );
            }
        }

        original
    }
}

/// スケジュールアプリケーションサービス
/// 営業日のスロット生成・取得・再生成を担当する
pub struct ScheduleApplicationService {
    slot_repository: Arc<dyn SlotRepository>,
    logger: Arc<dyn Logger>,
}

impl ScheduleApplicationService {
    /// 新しいスケジュールアプリケーションサービスを作成
    ///
    /// # Arguments
    /// * `slot_repository` - スロットリポジトリ
    /// * `logger` - ロガー
    pub fn new(slot_repository: Arc<dyn SlotRepository>, logger: Arc<dyn Logger>) -> Self {
        Self {
            slot_repository,
            logger,
        }
    }

    /// 指定した営業日のスロットを生成する
    /// 既にスロットが存在する場合は失敗する
    ///
    /// # Arguments
    /// * `date` - 営業日
    /// * `start` - 範囲の開始時刻
    /// * `end` - 範囲の終了時刻
    /// * `interval_minutes` - スロット幅（分）
    /// * `units_per_slot` - スロットあたりの最大ユニット数
    ///
    /// # Returns
    /// * `Ok(Vec<TimeSlot>)` - 生成したスロットのリスト
    /// * `Err(ApplicationError)` - 生成失敗
    pub async fn create_slots(
        &self,
        date: DayDate,
        start: TimeOfDay,
        end: TimeOfDay,
        interval_minutes: u16,
        units_per_slot: u32,
    ) -> Result<Vec<TimeSlot>, ApplicationError> {
        let existing = self.slot_repository.find_by_date(date).await?;
        if !existing.is_empty() {
            return Err(DomainError::InvalidValue(format!(
                "スロットは既に存在します: {}",
                date
            ))
            .into());
        }

        let slots = generate_slots(date, start, end, interval_minutes, units_per_slot)?;
        self.slot_repository.insert_slots(&slots).await?;

        self.logger.info(
            "ScheduleApplicationService",
            "スロットを生成",
            None,
            Some(HashMap::from([
                ("date".to_string(), date.to_string()),
                ("count".to_string(), slots.len().to_string()),
            ])),
        );

        Ok(slots)
    }

    /// 指定した営業日のスロットを取得する
    /// 開始時刻の昇順で並べて返す
    pub async fn list_slots(&self, date: DayDate) -> Result<Vec<TimeSlot>, ApplicationError> {
        self.slot_repository
            .find_by_date(date)
            .await
            .map_err(ApplicationError::from)
    }

    /// 指定した営業日のスロットを作り直す
    /// 既存のスロットをすべて削除してから生成する。予約数も失われる
    ///
    /// # Returns
    /// * `Ok(Vec<TimeSlot>)` - 生成したスロットのリスト
    /// * `Err(ApplicationError)` - 再生成失敗
    pub async fn regenerate_slots(
        &self,
        date: DayDate,
        start: TimeOfDay,
        end: TimeOfDay,
        interval_minutes: u16,
        units_per_slot: u32,
    ) -> Result<Vec<TimeSlot>, ApplicationError> {
        // 先に生成パラメータを検証し、無効な場合に削除だけ走るのを防ぐ
        let slots = generate_slots(date, start, end, interval_minutes, units_per_slot)?;

        let deleted = self.slot_repository.delete_by_date(date).await?;
        self.slot_repository.insert_slots(&slots).await?;

        self.logger.warn(
            "ScheduleApplicationService",
            "スロットを再生成（既存の予約数は失われた）",
            None,
            Some(HashMap::from([
                ("date".to_string(), date.to_string()),
                ("deleted".to_string(), deleted.to_string()),
                ("created".to_string(), slots.len().to_string()),
            ])),
        );

        Ok(slots)
    }
}

/// キャパシティアプリケーションサービス
/// 日次上限の参照と変更を担当する
pub struct CapacityApplicationService {
    daily_cap_repository: Arc<dyn DailyCapRepository>,
    logger: Arc<dyn Logger>,
    default_daily_limit: u32,
}

impl CapacityApplicationService {
    /// 新しいキャパシティアプリケーションサービスを作成
    ///
    /// # Arguments
    /// * `daily_cap_repository` - 日次上限リポジトリ
    /// * `logger` - ロガー
    /// * `default_daily_limit` - レコードが存在しない場合に使う上限
    pub fn new(
        daily_cap_repository: Arc<dyn DailyCapRepository>,
        logger: Arc<dyn Logger>,
        default_daily_limit: u32,
    ) -> Self {
        Self {
            daily_cap_repository,
            logger,
            default_daily_limit,
        }
    }

    /// 指定した営業日の上限を取得する
    /// レコードが存在しない場合はデフォルト上限の未予約状態を返す
    pub async fn get_cap(&self, date: DayDate) -> Result<DailyCap, ApplicationError> {
        let cap = self
            .daily_cap_repository
            .get(date)
            .await?
            .unwrap_or_else(|| DailyCap::new(date, self.default_daily_limit));
        Ok(cap)
    }

    /// 指定した営業日の上限を変更する
    /// 確定済みユニット数には影響しない
    pub async fn set_limit(&self, date: DayDate, limit: u32) -> Result<(), ApplicationError> {
        self.daily_cap_repository.set_limit(date, limit).await?;

        self.logger.info(
            "CapacityApplicationService",
            "日次上限を変更",
            None,
            Some(HashMap::from([
                ("date".to_string(), date.to_string()),
                ("limit".to_string(), limit.to_string()),
            ])),
        );

        Ok(())
    }
}

/// 注文アプリケーションサービス
/// 確定済み注文への管理者操作を担当する
pub struct OrderApplicationService {
    order_repository: Arc<dyn OrderRepository>,
    logger: Arc<dyn Logger>,
}

impl OrderApplicationService {
    /// 新しい注文アプリケーションサービスを作成
    ///
    /// # Arguments
    /// * `order_repository` - 注文リポジトリ
    /// * `logger` - ロガー
    pub fn new(order_repository: Arc<dyn OrderRepository>, logger: Arc<dyn Logger>) -> Self {
        Self {
            order_repository,
            logger,
        }
    }

    /// 注文を発送済みにマーク
    ///
    /// # Arguments
    /// * `order_id` - 注文ID
    ///
    /// # Returns
    /// * `Ok(())` - マーク成功
    /// * `Err(ApplicationError::NotFound)` - 注文が見つからない
    pub async fn mark_order_as_sent(&self, order_id: OrderId) -> Result<(), ApplicationError> {
        let mut order = self
            .order_repository
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| {
                ApplicationError::NotFound(format!("注文が見つかりません: {}", order_id))
            })?;

        order.mark_as_sent();
        self.order_repository.save(&order).await?;

        Ok(())
    }

    /// 注文を削除する
    /// 引き当て済みのキャパシティは戻さない（管理者の手動調整用）
    ///
    /// # Returns
    /// * `Ok(())` - 削除成功
    /// * `Err(ApplicationError::NotFound)` - 注文が見つからない
    pub async fn delete_order(&self, order_id: OrderId) -> Result<(), ApplicationError> {
        let deleted = self.order_repository.delete(order_id).await?;
        if !deleted {
            return Err(ApplicationError::NotFound(format!(
                "注文が見つかりません: {}",
                order_id
            )));
        }

        self.logger.info(
            "OrderApplicationService",
            "注文を削除",
            None,
            Some(HashMap::from([(
                "order_id".to_string(),
                order_id.to_string(),
            )])),
        );

        Ok(())
    }
}
