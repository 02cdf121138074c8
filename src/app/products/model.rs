//! 产品数据模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::core::{error::CoreError, parse::parse_float};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "precio")]
    pub price: f64,
    #[serde(rename = "categoria")]
    pub category: String,
    pub stock: i64,
    #[serde(rename = "fechaCreacion")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "fechaActualizacion")]
    pub updated_at: DateTime<Utc>,
}

/// 已验证、已规范化的产品字段
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFields {
    pub name: String,
    pub price: f64,
    pub category: String,
    pub stock: i64,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub fields: ProductFields,
    pub created_at: DateTime<Utc>,
}

/// 部分更新；`None` 的字段保持不变
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub stock: Option<i64>,
}

impl From<ProductFields> for ProductPatch {
    fn from(fields: ProductFields) -> Self {
        Self {
            name: Some(fields.name),
            price: Some(fields.price),
            category: Some(fields.category),
            stock: Some(fields.stock),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProductChanges {
    pub patch: ProductPatch,
    pub updated_at: DateTime<Utc>,
}

impl ProductChanges {
    pub fn apply(&self, product: &mut Product) {
        if let Some(name) = &self.patch.name {
            product.name = name.clone();
        }
        if let Some(price) = self.patch.price {
            product.price = price;
        }
        if let Some(category) = &self.patch.category {
            product.category = category.clone();
        }
        if let Some(stock) = self.patch.stock {
            product.stock = stock;
        }
        product.updated_at = self.updated_at;
    }
}

/// 列表过滤条件，各条件之间为 AND 关系
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    /// 类别子串，不区分大小写
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = &self.category {
            if !product
                .category
                .to_lowercase()
                .contains(&category.to_lowercase())
            {
                return false;
            }
        }
        if let Some(min) = self.min_price {
            if product.price < min {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if product.price > max {
                return false;
            }
        }
        true
    }
}

/// `GET /productos` 的查询参数，空字符串视为未提供
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductQuery {
    pub categoria: Option<String>,
    pub precio_min: Option<String>,
    pub precio_max: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

impl ProductQuery {
    pub fn to_filter(&self) -> Result<ProductFilter, CoreError> {
        let mut errors = Vec::new();
        let mut bound = |key: &str, raw: Option<&str>| -> Option<f64> {
            let raw = raw?;
            let parsed = parse_float(&Value::String(raw.to_string()));
            if parsed.is_none() {
                errors.push(format!("{} debe ser un número", key));
            }
            parsed
        };

        let min_price = bound("precio_min", present(&self.precio_min));
        let max_price = bound("precio_max", present(&self.precio_max));

        if !errors.is_empty() {
            return Err(CoreError::validation(errors));
        }

        Ok(ProductFilter {
            category: present(&self.categoria).map(|s| s.trim().to_string()),
            min_price,
            max_price,
        })
    }

    /// `filtros_aplicados` 回显
    pub fn applied(&self) -> Value {
        let echo = |value: &Option<String>| present(value).unwrap_or("ninguno").to_string();
        json!({
            "categoria": echo(&self.categoria),
            "precio_min": echo(&self.precio_min),
            "precio_max": echo(&self.precio_max),
        })
    }
}
