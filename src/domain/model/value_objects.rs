use crate::domain::error::DomainError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;

/// タイムスロットの一意識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotId(Uuid);

impl SlotId {
    /// 新しい一意のSlotIdを生成
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// UUIDから SlotId を作成
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// 文字列からSlotIdを作成
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        let uuid = Uuid::parse_str(s)?;
        Ok(Self(uuid))
    }

    /// 内部のUUIDを取得
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for SlotId {
    fn default() -> Self {
        Self::new()
    }
}

/// 商品（ピザ）の一意識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProductId(Uuid);

impl ProductId {
    /// 新しい一意のProductIdを生成
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// UUIDから ProductId を作成
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// 文字列からProductIdを作成
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        let uuid = Uuid::parse_str(s)?;
        Ok(Self(uuid))
    }

    /// 内部のUUIDを取得
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for ProductId {
    fn default() -> Self {
        Self::new()
    }
}

/// 注文の一意識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(Uuid);

impl OrderId {
    /// 新しい一意のOrderIdを生成
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// UUIDから OrderId を作成
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// 文字列からOrderIdを作成
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        let uuid = Uuid::parse_str(s)?;
        Ok(Self(uuid))
    }

    /// 内部のUUIDを取得
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

/// 営業日（カレンダー日）を表す値オブジェクト
/// `YYYY-MM-DD` 形式の文字列と相互変換できる
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DayDate(NaiveDate);

impl DayDate {
    /// NaiveDateから作成
    pub fn from_naive(date: NaiveDate) -> Self {
        Self(date)
    }

    /// `YYYY-MM-DD` 形式の文字列からDayDateを作成
    pub fn from_string(s: &str) -> Result<Self, DomainError> {
        let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
            DomainError::InvalidValue(format!("日付は YYYY-MM-DD 形式である必要があります: {}", s))
        })?;
        Ok(Self(date))
    }

    /// 内部のNaiveDateを取得
    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for DayDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// 1日の中の時刻（分精度）を表す値オブジェクト
/// `HH:MM` 形式で表示され、その文字列比較と同じ順序を持つ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimeOfDay(u16);

/// 1日の総分数（24:00はスロットの終端としてのみ現れる）
const MINUTES_PER_DAY: u16 = 24 * 60;

impl TimeOfDay {
    /// 0時ちょうどの時刻
    pub fn midnight() -> Self {
        Self(0)
    }

    /// 0時からの経過分数からTimeOfDayを作成
    /// 24:00（1440分）はスロットの終了時刻として許容する
    pub fn from_minutes(minutes: u16) -> Result<Self, DomainError> {
        if minutes > MINUTES_PER_DAY {
            return Err(DomainError::InvalidValue(format!(
                "時刻は0〜1440分の範囲である必要があります: {}",
                minutes
            )));
        }
        Ok(Self(minutes))
    }

    /// 時と分からTimeOfDayを作成
    pub fn from_parts(hour: u16, minute: u16) -> Result<Self, DomainError> {
        if minute >= 60 {
            return Err(DomainError::InvalidValue(format!("無効な分: {}", minute)));
        }
        Self::from_minutes(hour * 60 + minute)
    }

    /// `HH:MM` 形式の文字列からTimeOfDayを作成
    pub fn from_string(s: &str) -> Result<Self, DomainError> {
        let invalid =
            || DomainError::InvalidValue(format!("時刻は HH:MM 形式である必要があります: {}", s));

        let (hour_str, minute_str) = s.split_once(':').ok_or_else(invalid)?;
        if hour_str.len() != 2 || minute_str.len() != 2 {
            return Err(invalid());
        }
        let hour: u16 = hour_str.parse().map_err(|_| invalid())?;
        let minute: u16 = minute_str.parse().map_err(|_| invalid())?;

        Self::from_parts(hour, minute)
    }

    /// 0時からの経過分数を取得
    pub fn minutes(&self) -> u16 {
        self.0
    }

    /// 指定分数だけ後の時刻を返す
    /// 24:00を越える場合はNone
    pub fn add_minutes(&self, minutes: u16) -> Option<TimeOfDay> {
        let total = self.0.checked_add(minutes)?;
        if total > MINUTES_PER_DAY {
            return None;
        }
        Some(Self(total))
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

/// 通貨
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Currency {
    /// アルゼンチンペソ
    #[allow(clippy::upper_case_acronyms)]
    ARS,
}

/// 金額を表す値オブジェクト
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    amount: i64,
    currency: Currency,
}

impl Money {
    /// 金額と通貨から作成
    pub fn new(amount: i64, currency: String) -> Result<Self, DomainError> {
        let currency = match currency.as_str() {
            "ARS" => Currency::ARS,
            _ => {
                return Err(DomainError::InvalidValue(format!(
                    "サポートされていない通貨: {}",
                    currency
                )))
            }
        };
        Ok(Self { amount, currency })
    }

    /// アルゼンチンペソの金額を作成
    pub fn ars(amount: i64) -> Self {
        Self {
            amount,
            currency: Currency::ARS,
        }
    }

    /// 金額を取得
    pub fn amount(&self) -> i64 {
        self.amount
    }

    /// 通貨を文字列として取得
    pub fn currency(&self) -> String {
        match self.currency {
            Currency::ARS => "ARS".to_string(),
        }
    }
}

/// 支払い方法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// 現金
    Cash,
    /// 銀行振込
    Transfer,
    /// MercadoPago
    MercadoPago,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let method_str = match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Transfer => "Transfer",
            PaymentMethod::MercadoPago => "MercadoPago",
        };
        write!(f, "{}", method_str)
    }
}

impl PaymentMethod {
    /// 文字列からPaymentMethodを作成
    pub fn from_string(s: &str) -> Result<Self, DomainError> {
        match s {
            "Cash" => Ok(PaymentMethod::Cash),
            "Transfer" => Ok(PaymentMethod::Transfer),
            "MercadoPago" => Ok(PaymentMethod::MercadoPago),
            _ => Err(DomainError::InvalidValue(format!(
                "無効な支払い方法: {}",
                s
            ))),
        }
    }
}

/// 受け渡し方法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryType {
    /// 店頭受け取り
    Pickup,
    /// 配達
    Delivery,
}

impl fmt::Display for DeliveryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let type_str = match self {
            DeliveryType::Pickup => "Pickup",
            DeliveryType::Delivery => "Delivery",
        };
        write!(f, "{}", type_str)
    }
}

impl DeliveryType {
    /// 文字列からDeliveryTypeを作成
    pub fn from_string(s: &str) -> Result<Self, DomainError> {
        match s {
            "Pickup" => Ok(DeliveryType::Pickup),
            "Delivery" => Ok(DeliveryType::Delivery),
            _ => Err(DomainError::InvalidValue(format!(
                "無効な受け渡し方法: {}",
                s
            ))),
        }
    }
}

/// 商品ごとの注文数量を表す値オブジェクト
/// 在庫引き落としの単位
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemQuantity {
    product_id: ProductId,
    quantity: u32,
}

impl ItemQuantity {
    /// 新しい注文数量を作成
    /// 数量は1以上である必要がある
    pub fn new(product_id: ProductId, quantity: u32) -> Result<Self, DomainError> {
        if quantity == 0 {
            return Err(DomainError::InvalidQuantity);
        }
        Ok(Self {
            product_id,
            quantity,
        })
    }

    /// 商品IDを取得
    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    /// 数量を取得
    pub fn quantity(&self) -> u32 {
        self.quantity
    }
}
