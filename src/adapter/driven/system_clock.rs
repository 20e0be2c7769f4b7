use crate::domain::model::{DayDate, TimeOfDay};
use crate::domain::port::Clock;
use chrono::{Local, Timelike};

/// システム時計
/// ローカルタイムゾーンの現在日時を返すClock実装
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn today(&self) -> DayDate {
        DayDate::from_naive(Local::now().date_naive())
    }

    fn time_of_day(&self) -> TimeOfDay {
        let now = Local::now();
        // 時・分は常に0〜23 / 0〜59の範囲に収まる
        TimeOfDay::from_parts(now.hour() as u16, now.minute() as u16)
            .unwrap_or_else(|_| TimeOfDay::midnight())
    }
}
