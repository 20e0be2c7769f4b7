use crate::domain::error::DomainError;
use crate::domain::model::{DayDate, SlotId, TimeOfDay};

/// タイムスロット集約
/// 1本の製造ラインにおける固定幅の時間枠と、その予約数を管理する
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSlot {
    id: SlotId,
    date: DayDate,
    start_time: TimeOfDay,
    end_time: TimeOfDay,
    capacity: u32,
    booked: u32,
}

impl TimeSlot {
    /// 新しいタイムスロットを作成
    /// 事前条件: start_time < end_time、capacityは1以上
    pub fn new(
        id: SlotId,
        date: DayDate,
        start_time: TimeOfDay,
        end_time: TimeOfDay,
        capacity: u32,
    ) -> Result<Self, DomainError> {
        if start_time >= end_time {
            return Err(DomainError::InvalidRange(format!(
                "開始時刻は終了時刻より前である必要があります: {} >= {}",
                start_time, end_time
            )));
        }
        if capacity == 0 {
            return Err(DomainError::InvalidQuantity);
        }
        Ok(Self {
            id,
            date,
            start_time,
            end_time,
            capacity,
            booked: 0,
        })
    }

    /// データベースから取得したデータでスロットを再構築
    /// リポジトリでの使用を想定（不変条件 booked <= capacity は保存時に保証済み）
    pub fn reconstruct(
        id: SlotId,
        date: DayDate,
        start_time: TimeOfDay,
        end_time: TimeOfDay,
        capacity: u32,
        booked: u32,
    ) -> Self {
        Self {
            id,
            date,
            start_time,
            end_time,
            capacity,
            booked,
        }
    }

    /// スロットIDを取得
    pub fn id(&self) -> SlotId {
        self.id
    }

    /// 営業日を取得
    pub fn date(&self) -> DayDate {
        self.date
    }

    /// 開始時刻を取得
    pub fn start_time(&self) -> TimeOfDay {
        self.start_time
    }

    /// 終了時刻を取得
    pub fn end_time(&self) -> TimeOfDay {
        self.end_time
    }

    /// 容量（最大ユニット数）を取得
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// 予約済みユニット数を取得
    pub fn booked(&self) -> u32 {
        self.booked
    }

    /// 空き容量があるかチェック
    pub fn has_spare_capacity(&self) -> bool {
        self.booked < self.capacity
    }

    /// 残り容量を取得
    pub fn remaining_capacity(&self) -> u32 {
        self.capacity - self.booked
    }

    /// ユニットを予約する
    ///
    /// # Returns
    /// * `Ok(())` - 予約成功
    /// * `Err(DomainError::SlotFull)` - 容量超過
    pub fn book(&mut self, units: u32) -> Result<(), DomainError> {
        if self.booked + units > self.capacity {
            return Err(DomainError::SlotFull(self.id));
        }
        self.booked += units;
        Ok(())
    }

    /// 予約済みユニットを解放する（補償時など）
    /// 0未満にはならない
    pub fn release(&mut self, units: u32) {
        self.booked = self.booked.saturating_sub(units);
    }

    /// 次のスロットと隣接しているかチェック
    /// 同じ営業日で、自分の終了時刻が相手の開始時刻と一致する場合に隣接
    pub fn is_adjacent_to(&self, next: &TimeSlot) -> bool {
        self.date == next.date && self.end_time == next.start_time
    }
}

/// 1日分のスロットを生成する
/// `[start, end)` をinterval_minutes幅の連続スロットに分割し、
/// endを越える端数スロットは生成しない
///
/// # Arguments
/// * `date` - 営業日
/// * `start` - 範囲の開始時刻
/// * `end` - 範囲の終了時刻
/// * `interval_minutes` - スロット幅（1〜60分、1ユニットの製造時間）
/// * `units_per_slot` - スロットあたりの最大ユニット数
pub fn generate_slots(
    date: DayDate,
    start: TimeOfDay,
    end: TimeOfDay,
    interval_minutes: u16,
    units_per_slot: u32,
) -> Result<Vec<TimeSlot>, DomainError> {
    if start >= end {
        return Err(DomainError::InvalidRange(
            "開始時刻は終了時刻より前である必要があります".to_string(),
        ));
    }
    if interval_minutes == 0 || interval_minutes > 60 {
        return Err(DomainError::InvalidRange(
            "スロット幅は1〜60分である必要があります".to_string(),
        ));
    }
    if units_per_slot == 0 {
        return Err(DomainError::InvalidQuantity);
    }

    let mut slots = Vec::new();
    let mut current = start;

    while let Some(slot_end) = current.add_minutes(interval_minutes) {
        if slot_end > end {
            break;
        }
        slots.push(TimeSlot::new(
            SlotId::new(),
            date,
            current,
            slot_end,
            units_per_slot,
        )?);
        current = slot_end;
    }

    Ok(slots)
}
