use pizzeria_order_management::application::service::{
    PlaceOrderCommand, ReservationApplicationService,
};
use pizzeria_order_management::application::ApplicationError;
use pizzeria_order_management::domain::error::DomainError;
use pizzeria_order_management::domain::model::{
    DailyCap, DayDate, DeliveryType, ItemQuantity, Money, Order, OrderId, PaymentMethod,
    ProductId, ProductStock, SlotId, TimeOfDay, TimeSlot, DEFAULT_DAILY_LIMIT,
};
use pizzeria_order_management::domain::port::{
    Clock, DailyCapRepository, Logger, OrderRepository, RepositoryError, SlotRepository,
    StockRepository, StoreError,
};
use pizzeria_order_management::domain::service::AvailabilityService;

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

// テスト用のロガー（何も出力しない）
struct NullLogger;

impl Logger for NullLogger {
    fn debug(&self, _: &str, _: &str, _: Option<Uuid>, _: Option<HashMap<String, String>>) {}
    fn info(&self, _: &str, _: &str, _: Option<Uuid>, _: Option<HashMap<String, String>>) {}
    fn warn(&self, _: &str, _: &str, _: Option<Uuid>, _: Option<HashMap<String, String>>) {}
    fn error(&self, _: &str, _: &str, _: Option<Uuid>, _: Option<HashMap<String, String>>) {}
}

// テスト用のモックスロットリポジトリ
// ロック中に検証と更新を行うため、book_unitsは全か無かで動作する
struct MockSlotRepository {
    slots: Mutex<HashMap<SlotId, TimeSlot>>,
}

impl MockSlotRepository {
    fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }

    fn add_slot(&self, slot: TimeSlot) {
        let mut slots = self.slots.lock().unwrap();
        slots.insert(slot.id(), slot);
    }

    fn booked_of(&self, slot_id: SlotId) -> u32 {
        let slots = self.slots.lock().unwrap();
        slots.get(&slot_id).map(|s| s.booked()).unwrap_or(0)
    }
}

#[async_trait]
impl SlotRepository for MockSlotRepository {
    async fn insert_slots(&self, new_slots: &[TimeSlot]) -> Result<(), RepositoryError> {
        let mut slots = self.slots.lock().unwrap();
        for slot in new_slots {
            slots.insert(slot.id(), slot.clone());
        }
        Ok(())
    }

    async fn find_by_date(&self, date: DayDate) -> Result<Vec<TimeSlot>, RepositoryError> {
        let slots = self.slots.lock().unwrap();
        let mut result: Vec<TimeSlot> = slots
            .values()
            .filter(|s| s.date() == date)
            .cloned()
            .collect();
        result.sort_by_key(|s| s.start_time());
        Ok(result)
    }

    async fn book_units(
        &self,
        slot_ids: &[SlotId],
        units_per_slot: u32,
    ) -> Result<(), StoreError> {
        let mut slots = self.slots.lock().unwrap();

        for slot_id in slot_ids {
            let slot = slots
                .get(slot_id)
                .ok_or(StoreError::Domain(DomainError::SlotNotFound(*slot_id)))?;
            if slot.booked() + units_per_slot > slot.capacity() {
                return Err(StoreError::Domain(DomainError::SlotFull(*slot_id)));
            }
        }

        for slot_id in slot_ids {
            slots.get_mut(slot_id).unwrap().book(units_per_slot).unwrap();
        }
        Ok(())
    }

    async fn release_units(
        &self,
        slot_ids: &[SlotId],
        units_per_slot: u32,
    ) -> Result<(), RepositoryError> {
        let mut slots = self.slots.lock().unwrap();
        for slot_id in slot_ids {
            if let Some(slot) = slots.get_mut(slot_id) {
                slot.release(units_per_slot);
            }
        }
        Ok(())
    }

    async fn delete_by_date(&self, date: DayDate) -> Result<u64, RepositoryError> {
        let mut slots = self.slots.lock().unwrap();
        let before = slots.len();
        slots.retain(|_, s| s.date() != date);
        Ok((before - slots.len()) as u64)
    }

    fn next_identity(&self) -> SlotId {
        SlotId::new()
    }
}

// テスト用のモック日次上限リポジトリ
struct MockDailyCapRepository {
    caps: Mutex<HashMap<DayDate, DailyCap>>,
}

impl MockDailyCapRepository {
    fn new() -> Self {
        Self {
            caps: Mutex::new(HashMap::new()),
        }
    }

    fn add_cap(&self, cap: DailyCap) {
        let mut caps = self.caps.lock().unwrap();
        caps.insert(cap.date(), cap);
    }

    fn ordered_of(&self, date: DayDate) -> u32 {
        let caps = self.caps.lock().unwrap();
        caps.get(&date).map(|c| c.ordered()).unwrap_or(0)
    }
}

#[async_trait]
impl DailyCapRepository for MockDailyCapRepository {
    async fn reserve(
        &self,
        date: DayDate,
        units: u32,
        default_limit: u32,
    ) -> Result<(), StoreError> {
        let mut caps = self.caps.lock().unwrap();
        let cap = caps
            .entry(date)
            .or_insert_with(|| DailyCap::new(date, default_limit));
        cap.reserve(units).map_err(StoreError::Domain)
    }

    async fn release(&self, date: DayDate, units: u32) -> Result<(), RepositoryError> {
        let mut caps = self.caps.lock().unwrap();
        if let Some(cap) = caps.get_mut(&date) {
            cap.release(units);
        }
        Ok(())
    }

    async fn set_limit(&self, date: DayDate, limit: u32) -> Result<(), RepositoryError> {
        let mut caps = self.caps.lock().unwrap();
        caps.entry(date)
            .or_insert_with(|| DailyCap::new(date, limit))
            .set_limit(limit);
        Ok(())
    }

    async fn get(&self, date: DayDate) -> Result<Option<DailyCap>, RepositoryError> {
        let caps = self.caps.lock().unwrap();
        Ok(caps.get(&date).cloned())
    }
}

// テスト用のモック商品在庫リポジトリ
struct MockStockRepository {
    stocks: Mutex<HashMap<ProductId, ProductStock>>,
}

impl MockStockRepository {
    fn new() -> Self {
        Self {
            stocks: Mutex::new(HashMap::new()),
        }
    }

    fn add_stock(&self, stock: ProductStock) {
        let mut stocks = self.stocks.lock().unwrap();
        stocks.insert(stock.product_id(), stock);
    }

    fn stock_of(&self, product_id: ProductId) -> u32 {
        let stocks = self.stocks.lock().unwrap();
        stocks.get(&product_id).map(|s| s.stock()).unwrap_or(0)
    }
}

#[async_trait]
impl StockRepository for MockStockRepository {
    async fn decrement_all(&self, items: &[ItemQuantity]) -> Result<(), StoreError> {
        let mut stocks = self.stocks.lock().unwrap();

        for item in items {
            let stock = stocks.get(&item.product_id()).ok_or(StoreError::Domain(
                DomainError::ProductNotFound(item.product_id()),
            ))?;
            if stock.stock() < item.quantity() {
                return Err(StoreError::Domain(DomainError::InsufficientStock {
                    product_id: item.product_id(),
                    available: stock.stock(),
                    requested: item.quantity(),
                }));
            }
        }

        for item in items {
            stocks
                .get_mut(&item.product_id())
                .unwrap()
                .reserve(item.quantity())
                .unwrap();
        }
        Ok(())
    }

    async fn increment_all(&self, items: &[ItemQuantity]) -> Result<(), RepositoryError> {
        let mut stocks = self.stocks.lock().unwrap();
        for item in items {
            if let Some(stock) = stocks.get_mut(&item.product_id()) {
                stock.release(item.quantity());
            }
        }
        Ok(())
    }

    async fn save(&self, stock: &ProductStock) -> Result<(), RepositoryError> {
        let mut stocks = self.stocks.lock().unwrap();
        stocks.insert(stock.product_id(), stock.clone());
        Ok(())
    }

    async fn find_by_product_id(
        &self,
        product_id: ProductId,
    ) -> Result<Option<ProductStock>, RepositoryError> {
        let stocks = self.stocks.lock().unwrap();
        Ok(stocks.get(&product_id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<ProductStock>, RepositoryError> {
        let stocks = self.stocks.lock().unwrap();
        let mut result: Vec<ProductStock> = stocks.values().cloned().collect();
        result.sort_by_key(|s| s.product_id());
        Ok(result)
    }
}

// テスト用のモック注文リポジトリ
// fail_on_saveを立てると保存が常に失敗する（補償のテスト用）
struct MockOrderRepository {
    orders: Mutex<HashMap<OrderId, Order>>,
    fail_on_save: bool,
}

impl MockOrderRepository {
    fn new() -> Self {
        Self {
            orders: Mutex::new(HashMap::new()),
            fail_on_save: false,
        }
    }

    fn failing() -> Self {
        Self {
            orders: Mutex::new(HashMap::new()),
            fail_on_save: true,
        }
    }

    fn count(&self) -> usize {
        self.orders.lock().unwrap().len()
    }
}

#[async_trait]
impl OrderRepository for MockOrderRepository {
    async fn save(&self, order: &Order) -> Result<(), RepositoryError> {
        if self.fail_on_save {
            return Err(RepositoryError::OperationFailed(
                "simulated failure".to_string(),
            ));
        }
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
            .filter(|o| o.order_date() == date)
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

// テスト用の固定時計
struct FixedClock {
    today: DayDate,
    now: TimeOfDay,
}

impl Clock for FixedClock {
    fn today(&self) -> DayDate {
        self.today
    }

    fn time_of_day(&self) -> TimeOfDay {
        self.now
    }
}

// テストフィクスチャ
struct Fixture {
    slot_repository: Arc<MockSlotRepository>,
    daily_cap_repository: Arc<MockDailyCapRepository>,
    stock_repository: Arc<MockStockRepository>,
    order_repository: Arc<MockOrderRepository>,
    service: ReservationApplicationService,
}

fn build_fixture(order_repository: MockOrderRepository) -> Fixture {
    let slot_repository = Arc::new(MockSlotRepository::new());
    let daily_cap_repository = Arc::new(MockDailyCapRepository::new());
    let stock_repository = Arc::new(MockStockRepository::new());
    let order_repository = Arc::new(order_repository);

    let service = ReservationApplicationService::new(
        slot_repository.clone(),
        daily_cap_repository.clone(),
        stock_repository.clone(),
        order_repository.clone(),
        Arc::new(NullLogger),
        DEFAULT_DAILY_LIMIT,
    );

    Fixture {
        slot_repository,
        daily_cap_repository,
        stock_repository,
        order_repository,
        service,
    }
}

fn date() -> DayDate {
    DayDate::from_string("2025-03-14").unwrap()
}

fn time(s: &str) -> TimeOfDay {
    TimeOfDay::from_string(s).unwrap()
}

fn free_slot(start: &str, end: &str) -> TimeSlot {
    TimeSlot::reconstruct(SlotId::new(), date(), time(start), time(end), 1, 0)
}

fn command(
    items: Vec<ItemQuantity>,
    slot_ids: Vec<SlotId>,
    delivery_time: &str,
) -> PlaceOrderCommand {
    PlaceOrderCommand {
        customer_name: "Ana García".to_string(),
        summary: "test order".to_string(),
        order_date: date(),
        items,
        slot_ids,
        delivery_time: time(delivery_time),
        total: Money::ars(3000),
        payment_method: PaymentMethod::Cash,
        delivery_type: DeliveryType::Pickup,
    }
}

#[tokio::test]
async fn test_place_order_success_books_all_resources() {
    let fixture = build_fixture(MockOrderRepository::new());

    let slot1 = free_slot("20:00", "20:05");
    let slot2 = free_slot("20:05", "20:10");
    let slot_ids = vec![slot1.id(), slot2.id()];
    fixture.slot_repository.add_slot(slot1);
    fixture.slot_repository.add_slot(slot2);

    let product_id = ProductId::new();
    fixture
        .stock_repository
        .add_stock(ProductStock::new(product_id, 10));

    let items = vec![ItemQuantity::new(product_id, 2).unwrap()];
    let result = fixture
        .service
        .place_order(command(items, slot_ids.clone(), "20:10"))
        .await;

    let order_id = result.unwrap();

    // 全リソースが引き当てられ、注文が保存されている
    assert_eq!(fixture.slot_repository.booked_of(slot_ids[0]), 1);
    assert_eq!(fixture.slot_repository.booked_of(slot_ids[1]), 1);
    assert_eq!(fixture.daily_cap_repository.ordered_of(date()), 2);
    assert_eq!(fixture.stock_repository.stock_of(product_id), 8);

    let order = fixture
        .order_repository
        .find_by_id(order_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.pizza_units(), 2);
    assert!(!order.is_sent());
}

#[tokio::test]
async fn test_daily_cap_exceeded_reports_remaining_and_touches_nothing() {
    let fixture = build_fixture(MockOrderRepository::new());

    let slot1 = free_slot("20:00", "20:05");
    let slot2 = free_slot("20:05", "20:10");
    let slot_ids = vec![slot1.id(), slot2.id()];
    fixture.slot_repository.add_slot(slot1);
    fixture.slot_repository.add_slot(slot2);

    // 24枠中23枠が確定済み
    fixture
        .daily_cap_repository
        .add_cap(DailyCap::reconstruct(date(), DEFAULT_DAILY_LIMIT, 23));

    let product_id = ProductId::new();
    fixture
        .stock_repository
        .add_stock(ProductStock::new(product_id, 10));

    let items = vec![ItemQuantity::new(product_id, 2).unwrap()];
    let result = fixture
        .service
        .place_order(command(items, slot_ids.clone(), "20:10"))
        .await;

    match result {
        Err(ApplicationError::DomainError(DomainError::DailyCapExceeded { remaining })) => {
            assert_eq!(remaining, 1);
        }
        other => panic!("expected DailyCapExceeded, got {:?}", other.map(|_| ())),
    }

    // どのリソースにも変更がない
    assert_eq!(fixture.daily_cap_repository.ordered_of(date()), 23);
    assert_eq!(fixture.stock_repository.stock_of(product_id), 10);
    assert_eq!(fixture.slot_repository.booked_of(slot_ids[0]), 0);
    assert_eq!(fixture.order_repository.count(), 0);
}

#[tokio::test]
async fn test_insufficient_stock_releases_daily_cap() {
    let fixture = build_fixture(MockOrderRepository::new());

    let slot1 = free_slot("20:00", "20:05");
    let slot2 = free_slot("20:05", "20:10");
    let slot3 = free_slot("20:10", "20:15");
    let slot_ids = vec![slot1.id(), slot2.id(), slot3.id()];
    fixture.slot_repository.add_slot(slot1);
    fixture.slot_repository.add_slot(slot2);
    fixture.slot_repository.add_slot(slot3);

    let product_id = ProductId::new();
    fixture
        .stock_repository
        .add_stock(ProductStock::new(product_id, 2));

    let items = vec![ItemQuantity::new(product_id, 3).unwrap()];
    let result = fixture
        .service
        .place_order(command(items, slot_ids, "20:15"))
        .await;

    match result {
        Err(ApplicationError::DomainError(DomainError::InsufficientStock {
            product_id: failed_product,
            available,
            requested,
        })) => {
            assert_eq!(failed_product, product_id);
            assert_eq!(available, 2);
            assert_eq!(requested, 3);
        }
        other => panic!("expected InsufficientStock, got {:?}", other.map(|_| ())),
    }

    // 日次上限が巻き戻されている
    assert_eq!(fixture.daily_cap_repository.ordered_of(date()), 0);
    assert_eq!(fixture.stock_repository.stock_of(product_id), 2);
}

#[tokio::test]
async fn test_slot_full_releases_daily_cap_and_stock() {
    let fixture = build_fixture(MockOrderRepository::new());

    let slot1 = free_slot("20:00", "20:05");
    // 2番目のスロットは満席
    let slot2 = TimeSlot::reconstruct(SlotId::new(), date(), time("20:05"), time("20:10"), 1, 1);
    let slot_ids = vec![slot1.id(), slot2.id()];
    let full_slot_id = slot2.id();
    fixture.slot_repository.add_slot(slot1);
    fixture.slot_repository.add_slot(slot2);

    let product_id = ProductId::new();
    fixture
        .stock_repository
        .add_stock(ProductStock::new(product_id, 10));

    let items = vec![ItemQuantity::new(product_id, 2).unwrap()];
    let result = fixture
        .service
        .place_order(command(items, slot_ids.clone(), "20:10"))
        .await;

    match result {
        Err(ApplicationError::DomainError(DomainError::SlotFull(slot_id))) => {
            assert_eq!(slot_id, full_slot_id);
        }
        other => panic!("expected SlotFull, got {:?}", other.map(|_| ())),
    }

    // 上限・在庫とも巻き戻されている。スロットは全か無かで変更なし
    assert_eq!(fixture.daily_cap_repository.ordered_of(date()), 0);
    assert_eq!(fixture.stock_repository.stock_of(product_id), 10);
    assert_eq!(fixture.slot_repository.booked_of(slot_ids[0]), 0);
}

#[tokio::test]
async fn test_stale_slot_id_fails_with_not_found() {
    let fixture = build_fixture(MockOrderRepository::new());

    let slot1 = free_slot("20:00", "20:05");
    fixture.slot_repository.add_slot(slot1.clone());
    // 2番目のスロットIDは存在しない（古い検索結果の選択を想定）
    let stale_id = SlotId::new();

    let product_id = ProductId::new();
    fixture
        .stock_repository
        .add_stock(ProductStock::new(product_id, 10));

    let items = vec![ItemQuantity::new(product_id, 2).unwrap()];
    let result = fixture
        .service
        .place_order(command(items, vec![slot1.id(), stale_id], "20:10"))
        .await;

    match result {
        Err(ApplicationError::DomainError(DomainError::SlotNotFound(slot_id))) => {
            assert_eq!(slot_id, stale_id);
        }
        other => panic!("expected SlotNotFound, got {:?}", other.map(|_| ())),
    }

    assert_eq!(fixture.daily_cap_repository.ordered_of(date()), 0);
    assert_eq!(fixture.stock_repository.stock_of(product_id), 10);
    assert_eq!(fixture.slot_repository.booked_of(slot1.id()), 0);
}

#[tokio::test]
async fn test_order_save_failure_releases_everything() {
    let fixture = build_fixture(MockOrderRepository::failing());

    let slot1 = free_slot("20:00", "20:05");
    let slot2 = free_slot("20:05", "20:10");
    let slot_ids = vec![slot1.id(), slot2.id()];
    fixture.slot_repository.add_slot(slot1);
    fixture.slot_repository.add_slot(slot2);

    let product_id = ProductId::new();
    fixture
        .stock_repository
        .add_stock(ProductStock::new(product_id, 10));

    let items = vec![ItemQuantity::new(product_id, 2).unwrap()];
    let result = fixture
        .service
        .place_order(command(items, slot_ids.clone(), "20:10"))
        .await;

    assert!(matches!(result, Err(ApplicationError::RepositoryError(_))));

    // 3ステップすべてが巻き戻されている
    assert_eq!(fixture.daily_cap_repository.ordered_of(date()), 0);
    assert_eq!(fixture.stock_repository.stock_of(product_id), 10);
    assert_eq!(fixture.slot_repository.booked_of(slot_ids[0]), 0);
    assert_eq!(fixture.slot_repository.booked_of(slot_ids[1]), 0);
    assert_eq!(fixture.order_repository.count(), 0);
}

#[tokio::test]
async fn test_slot_count_mismatch_is_rejected_before_any_reservation() {
    let fixture = build_fixture(MockOrderRepository::new());

    let slot1 = free_slot("20:00", "20:05");
    fixture.slot_repository.add_slot(slot1.clone());

    let product_id = ProductId::new();
    fixture
        .stock_repository
        .add_stock(ProductStock::new(product_id, 10));

    // 2ユニットの注文に対してスロットが1つしかない
    let items = vec![ItemQuantity::new(product_id, 2).unwrap()];
    let result = fixture
        .service
        .place_order(command(items, vec![slot1.id()], "20:05"))
        .await;

    assert!(matches!(
        result,
        Err(ApplicationError::DomainError(DomainError::InvalidValue(_)))
    ));
    assert_eq!(fixture.daily_cap_repository.ordered_of(date()), 0);
    assert_eq!(fixture.stock_repository.stock_of(product_id), 10);
}

#[tokio::test]
async fn test_empty_items_are_rejected() {
    let fixture = build_fixture(MockOrderRepository::new());

    let result = fixture
        .service
        .place_order(command(vec![], vec![], "20:05"))
        .await;

    assert!(matches!(
        result,
        Err(ApplicationError::DomainError(DomainError::InvalidQuantity))
    ));
}

#[tokio::test]
async fn test_blank_customer_name_is_rejected_before_any_reservation() {
    let fixture = build_fixture(MockOrderRepository::new());

    let slot1 = free_slot("20:00", "20:05");
    fixture.slot_repository.add_slot(slot1.clone());

    let product_id = ProductId::new();
    fixture
        .stock_repository
        .add_stock(ProductStock::new(product_id, 10));

    let items = vec![ItemQuantity::new(product_id, 1).unwrap()];
    let mut cmd = command(items, vec![slot1.id()], "20:05");
    cmd.customer_name = "   ".to_string();

    let result = fixture.service.place_order(cmd).await;

    assert!(matches!(
        result,
        Err(ApplicationError::DomainError(DomainError::InvalidValue(_)))
    ));
    assert_eq!(fixture.daily_cap_repository.ordered_of(date()), 0);
    assert_eq!(fixture.stock_repository.stock_of(product_id), 10);
}

#[tokio::test]
async fn test_concurrent_orders_cannot_exceed_daily_cap() {
    let fixture = build_fixture(MockOrderRepository::new());

    // 上限2のところに2ユニットの注文が2件同時に来る
    fixture
        .daily_cap_repository
        .add_cap(DailyCap::new(date(), 2));

    let product_id = ProductId::new();
    fixture
        .stock_repository
        .add_stock(ProductStock::new(product_id, 10));

    // 各注文に専用のスロットを用意し、競合点を日次上限に絞る
    let mut slot_id_sets = Vec::new();
    for starts in [["20:00", "20:05"], ["20:10", "20:15"]] {
        let slot1 = free_slot(starts[0], starts[1]);
        let slot2 = free_slot(starts[1], "23:00");
        slot_id_sets.push(vec![slot1.id(), slot2.id()]);
        fixture.slot_repository.add_slot(slot1);
        fixture.slot_repository.add_slot(slot2);
    }

    let service = Arc::new(fixture.service);
    let mut handles = Vec::new();
    for slot_ids in slot_id_sets {
        let service = service.clone();
        let items = vec![ItemQuantity::new(product_id, 2).unwrap()];
        handles.push(tokio::spawn(async move {
            service.place_order(command(items, slot_ids, "23:00")).await
        }));
    }

    let mut successes = 0;
    let mut cap_rejections = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(ApplicationError::DomainError(DomainError::DailyCapExceeded { .. })) => {
                cap_rejections += 1
            }
            Err(other) => panic!("unexpected error: {}", other),
        }
    }

    // 勝者はちょうど1件、上限を越えるコミットは起こらない
    assert_eq!(successes, 1);
    assert_eq!(cap_rejections, 1);
    assert_eq!(fixture.daily_cap_repository.ordered_of(date()), 2);
    assert_eq!(fixture.order_repository.count(), 1);
}

#[tokio::test]
async fn test_availability_search_excludes_started_windows_today() {
    let slot_repository = MockSlotRepository::new();
    let slot1 = free_slot("20:00", "20:05");
    let slot2 = free_slot("20:05", "20:10");
    let slot3 = free_slot("20:10", "20:15");
    slot_repository.add_slot(slot1);
    slot_repository.add_slot(slot2);
    slot_repository.add_slot(slot3);

    // 今日の20:03時点で検索する
    let clock = FixedClock {
        today: date(),
        now: time("20:03"),
    };
    let service = AvailabilityService::new(slot_repository, clock);

    let windows = service.search(date(), 1).await.unwrap();

    // 20:00開始の時間帯は除外される
    assert_eq!(windows.len(), 2);
    assert_eq!(windows[0].prep_start_time, time("20:05"));
    assert_eq!(windows[1].prep_start_time, time("20:10"));
}

#[tokio::test]
async fn test_availability_search_keeps_all_windows_for_future_date() {
    let slot_repository = MockSlotRepository::new();
    let slot1 = free_slot("20:00", "20:05");
    let slot2 = free_slot("20:05", "20:10");
    slot_repository.add_slot(slot1);
    slot_repository.add_slot(slot2);

    // 検索対象は明日なのでカットオフは適用されない
    let clock = FixedClock {
        today: DayDate::from_string("2025-03-13").unwrap(),
        now: time("23:59"),
    };
    let service = AvailabilityService::new(slot_repository, clock);

    let windows = service.search(date(), 2).await.unwrap();

    assert_eq!(windows.len(), 1);
    assert_eq!(windows[0].prep_start_time, time("20:00"));
    assert_eq!(windows[0].delivery_time, time("20:10"));
}
