use crate::adapter::database_error::DatabaseError;
use crate::domain::error::DomainError;
use crate::domain::model::{ItemQuantity, ProductId, ProductStock};
use crate::domain::port::{RepositoryError, StockRepository, StoreError};
use async_trait::async_trait;
use sqlx::{MySql, Pool, Row};

/// MySQL商品在庫リポジトリ
/// MySQLデータベースを使用して商品在庫を永続化する
pub struct MySqlStockRepository {
    pool: Pool<MySql>,
}

impl MySqlStockRepository {
    /// 新しいMySQL商品在庫リポジトリを作成
    ///
    /// # Arguments
    /// * `pool` - MySQLコネクションプール
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StockRepository for MySqlStockRepository {
    async fn decrement_all(&self, items: &[ItemQuantity]) -> Result<(), StoreError> {
        // デッドロックを避けるため、常に商品IDの昇順でロックを取る
        let mut sorted: Vec<&ItemQuantity> = items.iter().collect();
        sorted.sort_by_key(|item| item.product_id());

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| {
                DatabaseError::ConnectionError(format!("トランザクション開始に失敗しました: {}", e))
            })
            .map_err(RepositoryError::from)?;

        // 全商品を検証してから更新する。途中で失敗した場合、
        // トランザクションのロールバックでどの在庫も変更されない
        for item in &sorted {
            let row = sqlx::query("SELECT stock FROM product_stock WHERE product_id = ? FOR UPDATE")
                .bind(item.product_id().to_string())
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| {
                    DatabaseError::QueryError(format!("在庫の取得に失敗しました: {}", e))
                })
                .map_err(RepositoryError::from)?
                .ok_or(StoreError::Domain(DomainError::ProductNotFound(
                    item.product_id(),
                )))?;

            let stock: u32 = row.get("stock");
            if stock < item.quantity() {
                return Err(StoreError::Domain(DomainError::InsufficientStock {
                    product_id: item.product_id(),
                    available: stock,
                    requested: item.quantity(),
                }));
            }
        }

        for item in &sorted {
            sqlx::query("UPDATE product_stock SET stock = stock - ? WHERE product_id = ?")
                .bind(item.quantity())
                .bind(item.product_id().to_string())
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    DatabaseError::QueryError(format!("在庫の引き落としに失敗しました: {}", e))
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

    async fn increment_all(&self, items: &[ItemQuantity]) -> Result<(), RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| {
                DatabaseError::ConnectionError(format!("トランザクション開始に失敗しました: {}", e))
            })
            .map_err(RepositoryError::from)?;

        for item in items {
            sqlx::query("UPDATE product_stock SET stock = stock + ? WHERE product_id = ?")
                .bind(item.quantity())
                .bind(item.product_id().to_string())
                .execute(&mut *tx)
                .await
                .map_err(|e| DatabaseError::QueryError(format!("在庫の復元に失敗しました: {}", e)))
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

    async fn save(&self, stock: &ProductStock) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO product_stock (product_id, stock)
            VALUES (?, ?)
            ON DUPLICATE KEY UPDATE stock = VALUES(stock)
            "#,
        )
        .bind(stock.product_id().to_string())
        .bind(stock.stock())
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("在庫の保存に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        Ok(())
    }

    async fn find_by_product_id(
        &self,
        product_id: ProductId,
    ) -> Result<Option<ProductStock>, RepositoryError> {
        let row = sqlx::query("SELECT product_id, stock FROM product_stock WHERE product_id = ?")
            .bind(product_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DatabaseError::QueryError(format!("在庫の取得に失敗しました: {}", e)))
            .map_err(RepositoryError::from)?;

        match row {
            Some(row) => {
                let product_id = ProductId::from_string(row.get("product_id")).map_err(|e| {
                    RepositoryError::FetchFailed(format!("商品IDの解析に失敗しました: {}", e))
                })?;
                Ok(Some(ProductStock::new(
                    product_id,
                    row.get::<u32, _>("stock"),
                )))
            }
            None => Ok(None),
        }
    }

    async fn find_all(&self) -> Result<Vec<ProductStock>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT product_id, stock FROM product_stock ORDER BY product_id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("在庫一覧の取得に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        rows.iter()
            .map(|row| {
                let product_id = ProductId::from_string(row.get("product_id")).map_err(|e| {
                    RepositoryError::FetchFailed(format!("商品IDの解析に失敗しました: {}", e))
                })?;
                Ok(ProductStock::new(product_id, row.get::<u32, _>("stock")))
            })
            .collect()
    }
}
