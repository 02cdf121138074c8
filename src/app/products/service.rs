//! 产品业务服务

use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use serde_json::{Map, Value};
use std::sync::Arc;

use super::model::{NewProduct, Product, ProductChanges, ProductFilter, ProductPatch};
use super::repository::ProductRepository;
use super::validation::{self, REQUIRED_FIELDS};
use crate::app::WriteMode;
use crate::core::error::CoreError;

pub const INVALID_ID: &str = "ID de producto inválido";

#[derive(Clone)]
pub struct ProductService {
    repository: Arc<dyn ProductRepository>,
}

impl ProductService {
    pub fn new(repository: Arc<dyn ProductRepository>) -> Self {
        Self { repository }
    }

    pub async fn list_all(&self, filter: &ProductFilter) -> Result<Vec<Product>, CoreError> {
        Ok(self.repository.list(filter).await?)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<Product>, CoreError> {
        match ObjectId::parse_str(id) {
            Ok(oid) => Ok(self.repository.find_by_id(oid).await?),
            Err(_) => Ok(None),
        }
    }

    pub async fn get_by_category(&self, category: &str) -> Result<Vec<Product>, CoreError> {
        Ok(self.repository.find_by_category(category.trim()).await?)
    }

    pub async fn create(&self, body: &Map<String, Value>) -> Result<Product, CoreError> {
        let fields = validation::validate_full(body).map_err(|errors| CoreError::Validation {
            errors,
            required_fields: Some(REQUIRED_FIELDS),
        })?;

        let new_product = NewProduct {
            fields,
            created_at: Utc::now(),
        };
        Ok(self.repository.insert(new_product).await?)
    }

    /// 部分更新（PATCH）
    pub async fn update(
        &self,
        id: &str,
        body: &Map<String, Value>,
    ) -> Result<Option<Product>, CoreError> {
        let oid = parse_write_id(id)?;
        let patch = validation::validate(body, WriteMode::Partial).map_err(CoreError::validation)?;
        self.apply(oid, patch).await
    }

    /// 整体替换（PUT）
    pub async fn replace(
        &self,
        id: &str,
        body: &Map<String, Value>,
    ) -> Result<Option<Product>, CoreError> {
        let oid = parse_write_id(id)?;
        let fields = validation::validate_full(body).map_err(|errors| CoreError::Validation {
            errors,
            required_fields: Some(REQUIRED_FIELDS),
        })?;
        self.apply(oid, fields.into()).await
    }

    pub async fn update_stock(
        &self,
        id: &str,
        stock: Option<&Value>,
    ) -> Result<Option<Product>, CoreError> {
        let oid = parse_write_id(id)?;
        let stock =
            validation::validate_stock(stock).map_err(|error| CoreError::validation(vec![error]))?;

        let patch = ProductPatch {
            stock: Some(stock),
            ..ProductPatch::default()
        };
        self.apply(oid, patch).await
    }

    pub async fn delete(&self, id: &str) -> Result<Option<Product>, CoreError> {
        match ObjectId::parse_str(id) {
            Ok(oid) => Ok(self.repository.delete(oid).await?),
            Err(_) => Ok(None),
        }
    }

    async fn apply(
        &self,
        id: ObjectId,
        patch: ProductPatch,
    ) -> Result<Option<Product>, CoreError> {
        let changes = ProductChanges {
            patch,
            updated_at: Utc::now(),
        };
        Ok(self.repository.update(id, changes).await?)
    }
}

fn parse_write_id(id: &str) -> Result<ObjectId, CoreError> {
    ObjectId::parse_str(id).map_err(|_| CoreError::InvalidIdentifier(INVALID_ID.to_string()))
}
