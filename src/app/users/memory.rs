//! 内存中的用户存储，供测试与无数据库运行使用

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::model::{NewUser, User, UserChanges};
use super::repository::UserRepository;
use crate::infrastructure::database::StoreError;

#[derive(Default)]
pub struct MemoryUserRepository {
    users: RwLock<BTreeMap<ObjectId, User>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn email_taken(users: &BTreeMap<ObjectId, User>, email: &str, except: Option<ObjectId>) -> bool {
    users
        .iter()
        .any(|(id, user)| Some(*id) != except && user.email == email)
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn list(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.users.read().await.values().cloned().collect())
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn insert(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if email_taken(&users, &new_user.fields.email, None) {
            return Err(StoreError::DuplicateKey(new_user.fields.email));
        }

        let id = ObjectId::new();
        let user = User {
            id: id.to_hex(),
            name: new_user.fields.name,
            email: new_user.fields.email,
            age: new_user.fields.age,
            created_at: new_user.created_at,
            updated_at: new_user.created_at,
        };
        users.insert(id, user.clone());
        Ok(user)
    }

    async fn update(
        &self,
        id: ObjectId,
        changes: UserChanges,
    ) -> Result<Option<User>, StoreError> {
        let mut users = self.users.write().await;
        if let Some(email) = &changes.patch.email {
            if email_taken(&users, email, Some(id)) {
                return Err(StoreError::DuplicateKey(email.clone()));
            }
        }

        Ok(users.get_mut(&id).map(|user| {
            changes.apply(user);
            user.clone()
        }))
    }

    async fn delete(&self, id: ObjectId) -> Result<Option<User>, StoreError> {
        Ok(self.users.write().await.remove(&id))
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.users.read().await.len() as u64)
    }
}
