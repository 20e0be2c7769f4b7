use crate::domain::model::{ProductId, SlotId};

/// ドメイン層のエラー型
/// ビジネスルール違反を表現する
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// 無効なスロット生成パラメータ（例: 開始時刻が終了時刻以降）
    InvalidRange(String),
    /// 日次上限超過（残り予約可能数を保持する）
    DailyCapExceeded { remaining: u32 },
    /// 在庫不足（どの商品が、いくつ足りないか）
    InsufficientStock {
        product_id: ProductId,
        available: u32,
        requested: u32,
    },
    /// スロットの容量超過（並行予約との競合など）
    SlotFull(SlotId),
    /// スロットが存在しない（古い検索結果の選択など）
    SlotNotFound(SlotId),
    /// 商品が存在しない
    ProductNotFound(ProductId),
    /// 無効な数量（例: 0の数量）
    InvalidQuantity,
    /// 無効な値
    InvalidValue(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainError::InvalidRange(msg) => write!(f, "Invalid slot range: {}", msg),
            DomainError::DailyCapExceeded { remaining } => {
                write!(f, "Daily cap exceeded: only {} units remain", remaining)
            }
            DomainError::InsufficientStock {
                product_id,
                available,
                requested,
            } => write!(
                f,
                "Insufficient stock for product {}: available {}, requested {}",
                product_id, available, requested
            ),
            DomainError::SlotFull(slot_id) => write!(f, "Slot {} is fully booked", slot_id),
            DomainError::SlotNotFound(slot_id) => write!(f, "Slot {} not found", slot_id),
            DomainError::ProductNotFound(product_id) => {
                write!(f, "Product {} not found", product_id)
            }
            DomainError::InvalidQuantity => write!(f, "Invalid quantity"),
            DomainError::InvalidValue(msg) => write!(f, "Invalid value: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}
