use crate::adapter::database_error::DatabaseError;
use crate::domain::error::DomainError;
use crate::domain::model::{DayDate, SlotId, TimeOfDay, TimeSlot};
use crate::domain::port::{RepositoryError, SlotRepository, StoreError};
use async_trait::async_trait;
use sqlx::{MySql, Pool, Row};

/// MySQLタイムスロットリポジトリ
/// MySQLデータベースを使用してタイムスロットを永続化する
pub struct MySqlSlotRepository {
    pool: Pool<MySql>,
}

impl MySqlSlotRepository {
    /// 新しいMySQLタイムスロットリポジトリを作成
    ///
    /// # Arguments
    /// * `pool` - MySQLコネクションプール
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }

    /// データベースの行からスロットを再構築する
    fn build_slot_from_row(row: &sqlx::mysql::MySqlRow) -> Result<TimeSlot, RepositoryError> {
        let id = SlotId::from_string(row.get("id")).map_err(|e| {
            RepositoryError::FetchFailed(format!("スロットIDの解析に失敗しました: {}", e))
        })?;
        let date = DayDate::from_string(row.get("slot_date")).map_err(|e| {
            RepositoryError::FetchFailed(format!("営業日の解析に失敗しました: {}", e))
        })?;
        let start_time = TimeOfDay::from_string(row.get("start_time")).map_err(|e| {
            RepositoryError::FetchFailed(format!("開始時刻の解析に失敗しました: {}", e))
        })?;
        let end_time = TimeOfDay::from_string(row.get("end_time")).map_err(|e| {
            RepositoryError::FetchFailed(format!("終了時刻の解析に失敗しました: {}", e))
        })?;

        Ok(TimeSlot::reconstruct(
            id,
            date,
            start_time,
            end_time,
            row.get::<u32, _>("capacity"),
            row.get::<u32, _>("booked"),
        ))
    }
}

#[async_trait]
impl SlotRepository for MySqlSlotRepository {
    async fn insert_slots(&self, slots: &[TimeSlot]) -> Result<(), RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| {
                DatabaseError::ConnectionError(format!("トランザクション開始に失敗しました: {}", e))
            })
            .map_err(RepositoryError::from)?;

        for slot in slots {
            sqlx::query(
                r#"
                INSERT INTO time_slots (id, slot_date, start_time, end_time, capacity, booked)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(slot.id().to_string())
            .bind(slot.date().to_string())
            .bind(slot.start_time().to_string())
            .bind(slot.end_time().to_string())
            .bind(slot.capacity())
            .bind(slot.booked())
            .execute(&mut *tx)
            .await
            .map_err(|e| DatabaseError::QueryError(format!("スロットの保存に失敗しました: {}", e)))
            .map_err(RepositoryError::from)?;
        }

        tx.commit()
            .await
            .map_err(|e| {
                DatabaseError::QueryError(format!(
                    "トランザクションのコミットに失敗しました: {}",
                    e
                ))
            })
            .map_err(RepositoryError::from)?;

        Ok(())
    }

    async fn find_by_date(&self, date: DayDate) -> Result<Vec<TimeSlot>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT id, slot_date, start_time, end_time, capacity, booked
            FROM time_slots
            WHERE slot_date = ?
            ORDER BY start_time ASC
            "#,
        )
        .bind(date.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("スロット一覧の取得に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        rows.iter().map(Self::build_slot_from_row).collect()
    }

    async fn book_units(
        &self,
        slot_ids: &[SlotId],
        units_per_slot: u32,
    ) -> Result<(), StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| {
                DatabaseError::ConnectionError(format!("トランザクション開始に失敗しました: {}", e))
            })
            .map_err(RepositoryError::from)?;

        // 全スロットを検証してから更新する。途中で失敗した場合、
        // トランザクションのロールバックでどのスロットも変更されない
        for slot_id in slot_ids {
            let row = sqlx::query(
                "SELECT capacity, booked FROM time_slots WHERE id = ? FOR UPDATE",
            )
            .bind(slot_id.to_string())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| DatabaseError::QueryError(format!("スロットの取得に失敗しました: {}", e)))
            .map_err(RepositoryError::from)?
            .ok_or(StoreError::Domain(DomainError::SlotNotFound(*slot_id)))?;

            let capacity: u32 = row.get("capacity");
            let booked: u32 = row.get("booked");
            if booked + units_per_slot > capacity {
                return Err(StoreError::Domain(DomainError::SlotFull(*slot_id)));
            }
        }

        for slot_id in slot_ids {
            sqlx::query("UPDATE time_slots SET booked = booked + ? WHERE id = ?")
                .bind(units_per_slot)
                .bind(slot_id.to_string())
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    DatabaseError::QueryError(format!("スロットの予約に失敗しました: {}", e))
                })
                .map_err(RepositoryError::from)?;
        }

        tx.commit()
            .await
            .map_err(|e| {
                DatabaseError::QueryError(format!(
                    "トランザクションのコミットに失敗しました: {}",
                    e
                ))
            })
            .map_err(RepositoryError::from)?;

        Ok(())
    }

    async fn release_units(
        &self,
        slot_ids: &[SlotId],
        units_per_slot: u32,
    ) -> Result<(), RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| {
                DatabaseError::ConnectionError(format!("トランザクション開始に失敗しました: {}", e))
            })
            .map_err(RepositoryError::from)?;

        // 予約数は0未満にはならない。存在しないスロットは読み飛ばす
        for slot_id in slot_ids {
            sqlx::query(
                "UPDATE time_slots SET booked = IF(booked >= ?, booked - ?, 0) WHERE id = ?",
            )
            .bind(units_per_slot)
            .bind(units_per_slot)
            .bind(slot_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| DatabaseError::QueryError(format!("スロットの解放に失敗しました: {}", e)))
            .map_err(RepositoryError::from)?;
        }

        tx.commit()
            .await
            .map_err(|e| {
                DatabaseError::QueryError(format!(
                    "トランザクションのコミットに失敗しました: {}",
                    e
                ))
            })
            .map_err(RepositoryError::from)?;

        Ok(())
    }

    async fn delete_by_date(&self, date: DayDate) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM time_slots WHERE slot_date = ?")
            .bind(date.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::QueryError(format!("スロットの削除に失敗しました: {}", e)))
            .map_err(RepositoryError::from)?;

        Ok(result.rows_affected())
    }

    fn next_identity(&self) -> SlotId {
        SlotId::new()
    }
}
