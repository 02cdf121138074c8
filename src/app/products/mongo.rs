//! MongoDB 产品存储

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, DateTime as BsonDateTime, Document},
    options::ReturnDocument,
    Collection, Database,
};
use serde::{Deserialize, Serialize};

use super::model::{NewProduct, Product, ProductChanges, ProductFilter};
use super::repository::ProductRepository;
use crate::infrastructure::database::{from_bson_datetime, to_bson_datetime, StoreError};

pub const COLLECTION: &str = "productos";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "precio")]
    pub price: f64,
    #[serde(rename = "categoria")]
    pub category: String,
    pub stock: i64,
    #[serde(rename = "fechaCreacion")]
    pub created_at: BsonDateTime,
    #[serde(rename = "fechaActualizacion")]
    pub updated_at: BsonDateTime,
}

impl From<ProductDocument> for Product {
    fn from(doc: ProductDocument) -> Self {
        Self {
            id: doc.id.to_hex(),
            name: doc.name,
            price: doc.price,
            category: doc.category,
            stock: doc.stock,
            created_at: from_bson_datetime(doc.created_at),
            updated_at: from_bson_datetime(doc.updated_at),
        }
    }
}

impl From<NewProduct> for ProductDocument {
    fn from(new_product: NewProduct) -> Self {
        let now = to_bson_datetime(new_product.created_at);
        Self {
            id: ObjectId::new(),
            name: new_product.fields.name,
            price: new_product.fields.price,
            category: new_product.fields.category,
            stock: new_product.fields.stock,
            created_at: now,
            updated_at: now,
        }
    }
}

/// 列表查询文档；类别按转义后的子串做不区分大小写匹配
pub fn filter_document(filter: &ProductFilter) -> Document {
    let mut query = Document::new();

    if let Some(category) = &filter.category {
        query.insert(
            "categoria",
            doc! { "$regex": regex::escape(category), "$options": "i" },
        );
    }

    let mut price = Document::new();
    if let Some(min) = filter.min_price {
        price.insert("$gte", min);
    }
    if let Some(max) = filter.max_price {
        price.insert("$lte", max);
    }
    if !price.is_empty() {
        query.insert("precio", price);
    }

    query
}

pub fn category_document(category: &str) -> Document {
    doc! {
        "categoria": {
            "$regex": format!("^{}$", regex::escape(category)),
            "$options": "i",
        }
    }
}

pub fn set_document(changes: &ProductChanges) -> Document {
    let mut set = Document::new();
    if let Some(name) = &changes.patch.name {
        set.insert("nombre", name.clone());
    }
    if let Some(price) = changes.patch.price {
        set.insert("precio", price);
    }
    if let Some(category) = &changes.patch.category {
        set.insert("categoria", category.clone());
    }
    if let Some(stock) = changes.patch.stock {
        set.insert("stock", stock);
    }
    set.insert("fechaActualizacion", to_bson_datetime(changes.updated_at));
    set
}

pub struct MongoProductRepository {
    collection: Collection<ProductDocument>,
}

impl MongoProductRepository {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection(COLLECTION),
        }
    }

    async fn find_many(&self, query: Document) -> Result<Vec<Product>, StoreError> {
        let documents: Vec<ProductDocument> =
            self.collection.find(query).await?.try_collect().await?;
        Ok(documents.into_iter().map(Product::from).collect())
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, StoreError> {
        self.find_many(filter_document(filter)).await
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Product>, StoreError> {
        let document = self.collection.find_one(doc! { "_id": id }).await?;
        Ok(document.map(Product::from))
    }

    async fn find_by_category(&self, category: &str) -> Result<Vec<Product>, StoreError> {
        self.find_many(category_document(category)).await
    }

    async fn insert(&self, new_product: NewProduct) -> Result<Product, StoreError> {
        let document = ProductDocument::from(new_product);
        self.collection.insert_one(&document).await?;
        Ok(document.into())
    }

    async fn update(
        &self,
        id: ObjectId,
        changes: ProductChanges,
    ) -> Result<Option<Product>, StoreError> {
        let document = self
            .collection
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set_document(&changes) })
            .return_document(ReturnDocument::After)
            .await?;
        Ok(document.map(Product::from))
    }

    async fn delete(&self, id: ObjectId) -> Result<Option<Product>, StoreError> {
        let document = self.collection.find_one_and_delete(doc! { "_id": id }).await?;
        Ok(document.map(Product::from))
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.collection.count_documents(doc! {}).await?)
    }
}
