// ドメインサービス
// 複数の集約にまたがるビジネスロジックを実装

use crate::domain::model::{DayDate, SlotId, TimeOfDay, TimeSlot};
use crate::domain::port::{Clock, RepositoryError, SlotRepository};

/// 受け渡し可能な時間帯
/// 連続した空きスロット列から導出される検索結果
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryWindow {
    /// 製造開始時刻（先頭スロットの開始時刻）
    pub prep_start_time: TimeOfDay,
    /// 受け渡し時刻（末尾スロットの終了時刻）
    pub delivery_time: TimeOfDay,
    /// 時間帯を構成するスロットのID（開始時刻の昇順）
    pub slot_ids: Vec<SlotId>,
}

/// スロット列から受け渡し可能な時間帯を探す
///
/// `required_units` 個の連続した空きスロット列ごとに1つの時間帯を返す。
/// スロット列が連続とみなされるのは、各スロットの終了時刻が
/// 次のスロットの開始時刻と一致する場合のみ。
/// `cutoff` を指定すると、製造開始時刻がそれ以前の時間帯を除外する
/// （当日検索で過去の時間帯を返さないため）
///
/// # Arguments
/// * `slots` - 開始時刻の昇順に並んだスロット列
/// * `required_units` - 必要なユニット数（= 必要な連続スロット数）
/// * `cutoff` - 製造開始時刻の下限（この時刻以前の開始は除外）
pub fn find_windows(
    slots: &[TimeSlot],
    required_units: u32,
    cutoff: Option<TimeOfDay>,
) -> Vec<DeliveryWindow> {
    let required = required_units as usize;
    if required == 0 || slots.len() < required {
        return Vec::new();
    }

    let mut windows = Vec::new();

    'candidate: for chunk in slots.windows(required) {
        let first = &chunk[0];

        if let Some(cutoff) = cutoff {
            if first.start_time() <= cutoff {
                continue;
            }
        }

        for slot in chunk {
            if !slot.has_spare_capacity() {
                continue 'candidate;
            }
        }
        for pair in chunk.windows(2) {
            if !pair[0].is_adjacent_to(&pair[1]) {
                continue 'candidate;
            }
        }

        windows.push(DeliveryWindow {
            prep_start_time: first.start_time(),
            delivery_time: chunk[required - 1].end_time(),
            slot_ids: chunk.iter().map(|s| s.id()).collect(),
        });
    }

    windows
}

/// 空き時間帯検索サービス
/// 営業日のスロットを読み出し、注文を収められる受け渡し時間帯を導出する
pub struct AvailabilityService<R: SlotRepository, C: Clock> {
    slot_repository: R,
    clock: C,
}

impl<R: SlotRepository, C: Clock> AvailabilityService<R, C> {
    /// 新しい空き時間帯検索サービスを作成
    ///
    /// # Arguments
    /// * `slot_repository` - スロットリポジトリ
    /// * `clock` - 時計（当日検索のカットオフ判定に使用）
    pub fn new(slot_repository: R, clock: C) -> Self {
        Self {
            slot_repository,
            clock,
        }
    }

    /// 指定した営業日の受け渡し可能な時間帯を検索する
    /// 営業日が今日の場合、既に始まっている時間帯は除外する
    ///
    /// # Arguments
    /// * `date` - 営業日
    /// * `required_units` - 必要なユニット数
    ///
    /// # Returns
    /// * `Ok(Vec<DeliveryWindow>)` - 受け渡し可能な時間帯のリスト（空の場合あり）
    /// * `Err(RepositoryError)` - スロットの取得失敗
    pub async fn search(
        &self,
        date: DayDate,
        required_units: u32,
    ) -> Result<Vec<DeliveryWindow>, RepositoryError> {
        let slots = self.slot_repository.find_by_date(date).await?;

        let cutoff = if date == self.clock.today() {
            Some(self.clock.time_of_day())
        } else {
            None
        };

        Ok(find_windows(&slots, required_units, cutoff))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> DayDate {
        DayDate::from_string("2025-03-14").unwrap()
    }

    fn time(s: &str) -> TimeOfDay {
        TimeOfDay::from_string(s).unwrap()
    }

    fn slot(start: &str, end: &str, capacity: u32, booked: u32) -> TimeSlot {
        TimeSlot::reconstruct(SlotId::new(), date(), time(start), time(end), capacity, booked)
    }

    #[test]
    fn test_single_window_from_two_free_slots() {
        let slots = vec![slot("20:00", "20:05", 1, 0), slot("20:05", "20:10", 1, 0)];

        let windows = find_windows(&slots, 2, None);

        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].prep_start_time, time("20:00"));
        assert_eq!(windows[0].delivery_time, time("20:10"));
        assert_eq!(
            windows[0].slot_ids,
            vec![slots[0].id(), slots[1].id()]
        );
    }

    #[test]
    fn test_windows_overlap_when_run_is_longer_than_needed() {
        // 3つの連続した空きスロットから2ユニットの時間帯は2つ取れる
        let slots = vec![
            slot("20:00", "20:05", 1, 0),
            slot("20:05", "20:10", 1, 0),
            slot("20:10", "20:15", 1, 0),
        ];

        let windows = find_windows(&slots, 2, None);

        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].delivery_time, time("20:10"));
        assert_eq!(windows[1].delivery_time, time("20:15"));
    }

    #[test]
    fn test_full_slot_breaks_run() {
        let slots = vec![
            slot("20:00", "20:05", 1, 0),
            slot("20:05", "20:10", 1, 1), // 満席
            slot("20:10", "20:15", 1, 0),
        ];

        let windows = find_windows(&slots, 2, None);
        assert!(windows.is_empty());

        // 1ユニットなら空きスロットごとに時間帯が取れる
        let windows = find_windows(&slots, 1, None);
        assert_eq!(windows.len(), 2);
    }

    #[test]
    fn test_gap_breaks_run() {
        // 20:05〜20:10が生成されていない（隙間）
        let slots = vec![slot("20:00", "20:05", 1, 0), slot("20:10", "20:15", 1, 0)];

        let windows = find_windows(&slots, 2, None);
        assert!(windows.is_empty());
    }

    #[test]
    fn test_partially_booked_slot_still_counts() {
        let slots = vec![slot("20:00", "20:05", 2, 1), slot("20:05", "20:10", 2, 1)];

        let windows = find_windows(&slots, 2, None);
        assert_eq!(windows.len(), 1);
    }

    #[test]
    fn test_cutoff_excludes_started_windows() {
        let slots = vec![
            slot("20:00", "20:05", 1, 0),
            slot("20:05", "20:10", 1, 0),
            slot("20:10", "20:15", 1, 0),
        ];

        // 20:00ちょうどの時点では、20:00開始の時間帯はもう選べない
        let windows = find_windows(&slots, 1, Some(time("20:00")));

        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].prep_start_time, time("20:05"));
    }

    #[test]
    fn test_zero_units_returns_nothing() {
        let slots = vec![slot("20:00", "20:05", 1, 0)];
        assert!(find_windows(&slots, 0, None).is_empty());
    }

    #[test]
    fn test_more_units_than_slots_returns_nothing() {
        let slots = vec![slot("20:00", "20:05", 1, 0)];
        assert!(find_windows(&slots, 2, None).is_empty());
    }
}
