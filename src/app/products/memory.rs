//! 内存中的产品存储

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::model::{NewProduct, Product, ProductChanges, ProductFilter};
use super::repository::ProductRepository;
use crate::infrastructure::database::StoreError;

#[derive(Default)]
pub struct MemoryProductRepository {
    products: RwLock<BTreeMap<ObjectId, Product>>,
}

impl MemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for MemoryProductRepository {
    async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, StoreError> {
        Ok(self
            .products
            .read()
            .await
            .values()
            .filter(|product| filter.matches(product))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Product>, StoreError> {
        Ok(self.products.read().await.get(&id).cloned())
    }

    async fn find_by_category(&self, category: &str) -> Result<Vec<Product>, StoreError> {
        let category = category.to_lowercase();
        Ok(self
            .products
            .read()
            .await
            .values()
            .filter(|product| product.category.to_lowercase() == category)
            .cloned()
            .collect())
    }

    async fn insert(&self, new_product: NewProduct) -> Result<Product, StoreError> {
        let id = ObjectId::new();
        let product = Product {
            id: id.to_hex(),
            name: new_product.fields.name,
            price: new_product.fields.price,
            category: new_product.fields.category,
            stock: new_product.fields.stock,
            created_at: new_product.created_at,
            updated_at: new_product.created_at,
        };
        self.products.write().await.insert(id, product.clone());
        Ok(product)
    }

    async fn update(
        &self,
        id: ObjectId,
        changes: ProductChanges,
    ) -> Result<Option<Product>, StoreError> {
        Ok(self.products.write().await.get_mut(&id).map(|product| {
            changes.apply(product);
            product.clone()
        }))
    }

    async fn delete(&self, id: ObjectId) -> Result<Option<Product>, StoreError> {
        Ok(self.products.write().await.remove(&id))
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.products.read().await.len() as u64)
    }
}
