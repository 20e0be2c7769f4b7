use crate::adapter::database_error::DatabaseError;
use crate::domain::error::DomainError;
use crate::domain::model::{DailyCap, DayDate};
use crate::domain::port::{DailyCapRepository, RepositoryError, StoreError};
use async_trait::async_trait;
use sqlx::{MySql, Pool, Row};

/// MySQL日次上限リポジトリ
/// MySQLデータベースを使用して日次上限を永続化する
pub struct MySqlDailyCapRepository {
    pool: Pool<MySql>,
}

impl MySqlDailyCapRepository {
    /// 新しいMySQL日次上限リポジトリを作成
    ///
    /// # Arguments
    /// * `pool` - MySQLコネクションプール
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DailyCapRepository for MySqlDailyCapRepository {
    async fn reserve(
        &self,
        date: DayDate,
        units: u32,
        default_limit: u32,
    ) -> Result<(), StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| {
                DatabaseError::ConnectionError(format!("トランザクション開始に失敗しました: {}", e))
            })
            .map_err(RepositoryError::from)?;

        // 行ロックを取得してから検証する。並行する予約は
        // ここで直列化され、上限を越えるコミットは起こらない
        let row = sqlx::query(
            "SELECT limit_units, ordered_units FROM daily_caps WHERE cap_date = ? FOR UPDATE",
        )
        .bind(date.to_string())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("日次上限の取得に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        let (limit, ordered) = match &row {
            Some(row) => (
                row.get::<u32, _>("limit_units"),
                row.get::<u32, _>("ordered_units"),
            ),
            None => (default_limit, 0),
        };

        if ordered + units > limit {
            return Err(StoreError::Domain(DomainError::DailyCapExceeded {
                remaining: limit.saturating_sub(ordered),
            }));
        }

        // 既存レコードの上限には触れない（ordered_unitsのみ更新）
        sqlx::query(
            r#"
            INSERT INTO daily_caps (cap_date, limit_units, ordered_units)
            VALUES (?, ?, ?)
            ON DUPLICATE KEY UPDATE ordered_units = VALUES(ordered_units)
            "#,
        )
        .bind(date.to_string())
        .bind(limit)
        .bind(ordered + units)
        .execute(&mut *tx)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("日次上限の更新に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

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

    async fn release(&self, date: DayDate, units: u32) -> Result<(), RepositoryError> {
        // 確定数は0未満にはならない。レコードが存在しない場合は何もしない
        sqlx::query(
            r#"
            UPDATE daily_caps
            SET ordered_units = IF(ordered_units >= ?, ordered_units - ?, 0)
            WHERE cap_date = ?
            "#,
        )
        .bind(units)
        .bind(units)
        .bind(date.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("日次上限の解放に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        Ok(())
    }

    async fn set_limit(&self, date: DayDate, limit: u32) -> Result<(), RepositoryError> {
        // 確定済み数には触れない
        sqlx::query(
            r#"
            INSERT INTO daily_caps (cap_date, limit_units, ordered_units)
            VALUES (?, ?, 0)
            ON DUPLICATE KEY UPDATE limit_units = VALUES(limit_units)
            "#,
        )
        .bind(date.to_string())
        .bind(limit)
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("日次上限の変更に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        Ok(())
    }

    async fn get(&self, date: DayDate) -> Result<Option<DailyCap>, RepositoryError> {
        let row = sqlx::query(
            "SELECT cap_date, limit_units, ordered_units FROM daily_caps WHERE cap_date = ?",
        )
        .bind(date.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("日次上限の取得に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        match row {
            Some(row) => {
                let date = DayDate::from_string(row.get("cap_date")).map_err(|e| {
                    RepositoryError::FetchFailed(format!("営業日の解析に失敗しました: {}", e))
                })?;
                Ok(Some(DailyCap::reconstruct(
                    date,
                    row.get::<u32, _>("limit_units"),
                    row.get::<u32, _>("ordered_units"),
                )))
            }
            None => Ok(None),
        }
    }
}
