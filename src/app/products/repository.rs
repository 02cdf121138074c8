//! 产品存储接口

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use super::model::{NewProduct, Product, ProductChanges, ProductFilter};
use crate::infrastructure::database::StoreError;

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, StoreError>;

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Product>, StoreError>;

    /// 类别完全匹配，不区分大小写
    async fn find_by_category(&self, category: &str) -> Result<Vec<Product>, StoreError>;

    async fn insert(&self, product: NewProduct) -> Result<Product, StoreError>;

    async fn update(
        &self,
        id: ObjectId,
        changes: ProductChanges,
    ) -> Result<Option<Product>, StoreError>;

    async fn delete(&self, id: ObjectId) -> Result<Option<Product>, StoreError>;

    async fn count(&self) -> Result<u64, StoreError>;
}
