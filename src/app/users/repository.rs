//! 用户存储接口

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use super::model::{NewUser, User, UserChanges};
use crate::infrastructure::database::StoreError;

/// 用户集合的存储操作，不含任何业务规则
///
/// 实现方必须把邮箱冲突报告为 `StoreError::DuplicateKey`。
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<User>, StoreError>;

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<User>, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn insert(&self, user: NewUser) -> Result<User, StoreError>;

    /// 返回更新后的用户，不存在时返回 `None`
    async fn update(&self, id: ObjectId, changes: UserChanges)
        -> Result<Option<User>, StoreError>;

    /// 返回删除前的快照，不存在时返回 `None`
    async fn delete(&self, id: ObjectId) -> Result<Option<User>, StoreError>;

    async fn count(&self) -> Result<u64, StoreError>;
}
