use crate::domain::error::DomainError;
use crate::domain::model::ProductId;

/// 商品在庫集約
/// 商品（ピザの種類）ごとの引き当て可能ユニット数を管理する
#[derive(Debug, Clone, PartialEq)]
pub struct ProductStock {
    product_id: ProductId,
    stock: u32,
}

impl ProductStock {
    /// 新しい商品在庫を作成
    ///
    /// # Arguments
    /// * `product_id` - 商品ID
    /// * `stock` - 在庫数
    pub fn new(product_id: ProductId, stock: u32) -> Self {
        Self { product_id, stock }
    }

    /// 商品IDを取得
    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    /// 在庫数を取得
    pub fn stock(&self) -> u32 {
        self.stock
    }

    /// 在庫を引き当てる
    ///
    /// # Returns
    /// * `Ok(())` - 引き当て成功
    /// * `Err(DomainError::InsufficientStock)` - 在庫不足
    pub fn reserve(&mut self, quantity: u32) -> Result<(), DomainError> {
        if self.stock < quantity {
            return Err(DomainError::InsufficientStock {
                product_id: self.product_id,
                available: self.stock,
                requested: quantity,
            });
        }
        self.stock -= quantity;
        Ok(())
    }

    /// 在庫を戻す（補償時など）
    pub fn release(&mut self, quantity: u32) {
        self.stock += quantity;
    }

    /// 指定された数量の在庫が利用可能かチェック
    pub fn has_available_stock(&self, quantity: u32) -> bool {
        self.stock >= quantity
    }
}
