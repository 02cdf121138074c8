//! MongoDB 用户存储

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, DateTime as BsonDateTime, Document},
    options::ReturnDocument,
    Collection, Database,
};
use serde::{Deserialize, Serialize};

use super::model::{NewUser, User, UserChanges};
use super::repository::UserRepository;
use crate::infrastructure::database::{from_bson_datetime, to_bson_datetime, StoreError};

pub const COLLECTION: &str = "usuarios";

/// 集合中的文档形态
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    #[serde(rename = "edad")]
    pub age: i64,
    #[serde(rename = "fechaCreacion")]
    pub created_at: BsonDateTime,
    #[serde(rename = "fechaActualizacion")]
    pub updated_at: BsonDateTime,
}

impl From<UserDocument> for User {
    fn from(doc: UserDocument) -> Self {
        Self {
            id: doc.id.to_hex(),
            name: doc.name,
            email: doc.email,
            age: doc.age,
            created_at: from_bson_datetime(doc.created_at),
            updated_at: from_bson_datetime(doc.updated_at),
        }
    }
}

impl From<NewUser> for UserDocument {
    fn from(new_user: NewUser) -> Self {
        let now = to_bson_datetime(new_user.created_at);
        Self {
            id: ObjectId::new(),
            name: new_user.fields.name,
            email: new_user.fields.email,
            age: new_user.fields.age,
            created_at: now,
            updated_at: now,
        }
    }
}

/// 构造 `$set` 文档，只包含提供的字段和更新时间
pub fn set_document(changes: &UserChanges) -> Document {
    let mut set = Document::new();
    if let Some(name) = &changes.patch.name {
        set.insert("nombre", name.clone());
    }
    if let Some(email) = &changes.patch.email {
        set.insert("email", email.clone());
    }
    if let Some(age) = changes.patch.age {
        set.insert("edad", age);
    }
    set.insert("fechaActualizacion", to_bson_datetime(changes.updated_at));
    set
}

pub struct MongoUserRepository {
    collection: Collection<UserDocument>,
}

impl MongoUserRepository {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection(COLLECTION),
        }
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let documents: Vec<UserDocument> = self.collection.find(doc! {}).await?.try_collect().await?;
        Ok(documents.into_iter().map(User::from).collect())
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<User>, StoreError> {
        let document = self.collection.find_one(doc! { "_id": id }).await?;
        Ok(document.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let document = self.collection.find_one(doc! { "email": email }).await?;
        Ok(document.map(User::from))
    }

    async fn insert(&self, new_user: NewUser) -> Result<User, StoreError> {
        let document = UserDocument::from(new_user);
        self.collection.insert_one(&document).await?;
        Ok(document.into())
    }

    async fn update(
        &self,
        id: ObjectId,
        changes: UserChanges,
    ) -> Result<Option<User>, StoreError> {
        let document = self
            .collection
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set_document(&changes) })
            .return_document(ReturnDocument::After)
            .await?;
        Ok(document.map(User::from))
    }

    async fn delete(&self, id: ObjectId) -> Result<Option<User>, StoreError> {
        let document = self.collection.find_one_and_delete(doc! { "_id": id }).await?;
        Ok(document.map(User::from))
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.collection.count_documents(doc! {}).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::users::model::UserPatch;
    use chrono::Utc;

    #[test]
    fn test_set_document_only_contains_supplied_fields() {
        let changes = UserChanges {
            patch: UserPatch {
                age: Some(31),
                ..UserPatch::default()
            },
            updated_at: Utc::now(),
        };

        let set = set_document(&changes);
        assert_eq!(set.get_i64("edad").unwrap(), 31);
        assert!(set.get_datetime("fechaActualizacion").is_ok());
        assert!(!set.contains_key("nombre"));
        assert!(!set.contains_key("email"));
    }

    #[test]
    fn test_empty_patch_only_touches_update_timestamp() {
        let changes = UserChanges {
            patch: UserPatch::default(),
            updated_at: Utc::now(),
        };
        let set = set_document(&changes);
        assert_eq!(set.len(), 1);
        assert!(set.contains_key("fechaActualizacion"));
    }

    #[test]
    fn test_document_round_trip_keeps_hex_id() {
        let id = ObjectId::new();
        let now = to_bson_datetime(Utc::now());
        let user = User::from(UserDocument {
            id,
            name: "Juan Pérez".to_string(),
            email: "juan@email.com".to_string(),
            age: 30,
            created_at: now,
            updated_at: now,
        });
        assert_eq!(user.id, id.to_hex());
        assert_eq!(user.created_at, from_bson_datetime(now));
    }
}
