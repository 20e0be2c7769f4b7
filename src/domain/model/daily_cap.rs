use crate::domain::error::DomainError;
use crate::domain::model::DayDate;

/// デフォルトの日次上限（1日に受注できる総ユニット数）
pub const DEFAULT_DAILY_LIMIT: u32 = 24;

/// 日次上限集約
/// 1営業日に受注できる総ユニット数と、既に確定した数を管理する
#[derive(Debug, Clone, PartialEq)]
pub struct DailyCap {
    date: DayDate,
    limit: u32,
    ordered: u32,
}

impl DailyCap {
    /// 指定した上限で新しい日次上限を作成
    pub fn new(date: DayDate, limit: u32) -> Self {
        Self {
            date,
            limit,
            ordered: 0,
        }
    }

    /// 永続化されたデータから日次上限を再構築
    pub fn reconstruct(date: DayDate, limit: u32, ordered: u32) -> Self {
        Self {
            date,
            limit,
            ordered,
        }
    }

    /// 営業日を取得
    pub fn date(&self) -> DayDate {
        self.date
    }

    /// 上限を取得
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// 確定済みユニット数を取得
    pub fn ordered(&self) -> u32 {
        self.ordered
    }

    /// 残り予約可能数を取得
    pub fn remaining(&self) -> u32 {
        self.limit.saturating_sub(self.ordered)
    }

    /// ユニットを予約する
    ///
    /// # Returns
    /// * `Ok(())` - 予約成功
    /// * `Err(DomainError::DailyCapExceeded)` - 上限超過（残数を含む）
    pub fn reserve(&mut self, units: u32) -> Result<(), DomainError> {
        if self.ordered + units > self.limit {
            return Err(DomainError::DailyCapExceeded {
                remaining: self.remaining(),
            });
        }
        self.ordered += units;
        Ok(())
    }

    /// 予約済みユニットを解放する（補償時など）
    /// 0未満にはならない
    pub fn release(&mut self, units: u32) {
        self.ordered = self.ordered.saturating_sub(units);
    }

    /// 上限を変更する（管理者操作）
    /// 確定済み数には触れない
    pub fn set_limit(&mut self, limit: u32) {
        self.limit = limit;
    }
}
