//! 用户业务服务
//!
//! 写入前先验证，再检查邮箱唯一性，最后交给存储。邮箱的预检查只是为了
//! 给出友好的提示，真正的唯一性由存储层保证。

use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use serde_json::{Map, Value};
use std::sync::Arc;

use super::model::{NewUser, User, UserChanges, UserPatch};
use super::repository::UserRepository;
use super::validation::{self, normalize_email, REQUIRED_FIELDS};
use crate::app::WriteMode;
use crate::core::error::CoreError;
use crate::infrastructure::database::StoreError;

const EMAIL_TAKEN: &str = "El email ya está registrado";
const EMAIL_TAKEN_BY_OTHER: &str = "El email ya está registrado por otro usuario";
pub const INVALID_ID: &str = "ID de usuario inválido";

#[derive(Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    pub async fn list_all(&self) -> Result<Vec<User>, CoreError> {
        Ok(self.repository.list().await?)
    }

    /// 无效 ID 与不存在的用户一样返回 `None`
    pub async fn get_by_id(&self, id: &str) -> Result<Option<User>, CoreError> {
        match ObjectId::parse_str(id) {
            Ok(oid) => Ok(self.repository.find_by_id(oid).await?),
            Err(_) => Ok(None),
        }
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, CoreError> {
        Ok(self
            .repository
            .find_by_email(&normalize_email(email))
            .await?)
    }

    pub async fn create(&self, body: &Map<String, Value>) -> Result<User, CoreError> {
        let fields = validation::validate_full(body).map_err(|errors| CoreError::Validation {
            errors,
            required_fields: Some(REQUIRED_FIELDS),
        })?;

        if self.repository.find_by_email(&fields.email).await?.is_some() {
            return Err(CoreError::DuplicateEmail(EMAIL_TAKEN.to_string()));
        }

        let new_user = NewUser {
            fields,
            created_at: Utc::now(),
        };
        self.repository
            .insert(new_user)
            .await
            .map_err(|err| duplicate_as(err, EMAIL_TAKEN))
    }

    /// 部分更新（PATCH）
    pub async fn update(
        &self,
        id: &str,
        body: &Map<String, Value>,
    ) -> Result<Option<User>, CoreError> {
        let oid = parse_write_id(id)?;
        let patch = validation::validate(body, WriteMode::Partial).map_err(CoreError::validation)?;
        self.apply(oid, patch).await
    }

    /// 整体替换（PUT），所有字段都必须提供
    pub async fn replace(
        &self,
        id: &str,
        body: &Map<String, Value>,
    ) -> Result<Option<User>, CoreError> {
        let oid = parse_write_id(id)?;
        let fields = validation::validate_full(body).map_err(|errors| CoreError::Validation {
            errors,
            required_fields: Some(REQUIRED_FIELDS),
        })?;
        self.apply(oid, fields.into()).await
    }

    pub async fn delete(&self, id: &str) -> Result<Option<User>, CoreError> {
        match ObjectId::parse_str(id) {
            Ok(oid) => Ok(self.repository.delete(oid).await?),
            Err(_) => Ok(None),
        }
    }

    async fn apply(&self, id: ObjectId, patch: UserPatch) -> Result<Option<User>, CoreError> {
        let Some(existing) = self.repository.find_by_id(id).await? else {
            return Ok(None);
        };

        if let Some(email) = &patch.email {
            if *email != existing.email {
                if let Some(holder) = self.repository.find_by_email(email).await? {
                    if holder.id != existing.id {
                        return Err(CoreError::DuplicateEmail(EMAIL_TAKEN_BY_OTHER.to_string()));
                    }
                }
            }
        }

        let changes = UserChanges {
            patch,
            updated_at: Utc::now(),
        };
        self.repository
            .update(id, changes)
            .await
            .map_err(|err| duplicate_as(err, EMAIL_TAKEN_BY_OTHER))
    }
}

fn parse_write_id(id: &str) -> Result<ObjectId, CoreError> {
    ObjectId::parse_str(id).map_err(|_| CoreError::InvalidIdentifier(INVALID_ID.to_string()))
}

/// 存储层的唯一键冲突就是邮箱重复
fn duplicate_as(err: StoreError, message: &str) -> CoreError {
    match err {
        StoreError::DuplicateKey(_) => CoreError::DuplicateEmail(message.to_string()),
        other => CoreError::Store(other),
    }
}
