//! 用户数据模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    #[serde(rename = "edad")]
    pub age: i64,
    #[serde(rename = "fechaCreacion")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "fechaActualizacion")]
    pub updated_at: DateTime<Utc>,
}

/// 已验证、已规范化的用户字段
#[derive(Debug, Clone, PartialEq)]
pub struct UserFields {
    pub name: String,
    pub email: String,
    pub age: i64,
}

/// 待插入的用户，两个时间戳都取 `created_at`
#[derive(Debug, Clone)]
pub struct NewUser {
    pub fields: UserFields,
    pub created_at: DateTime<Utc>,
}

/// 部分更新；`None` 的字段保持不变
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<i64>,
}

impl From<UserFields> for UserPatch {
    fn from(fields: UserFields) -> Self {
        Self {
            name: Some(fields.name),
            email: Some(fields.email),
            age: Some(fields.age),
        }
    }
}

/// 写入存储的变更集
#[derive(Debug, Clone)]
pub struct UserChanges {
    pub patch: UserPatch,
    pub updated_at: DateTime<Utc>,
}

impl UserChanges {
    pub fn apply(&self, user: &mut User) {
        if let Some(name) = &self.patch.name {
            user.name = name.clone();
        }
        if let Some(email) = &self.patch.email {
            user.email = email.clone();
        }
        if let Some(age) = self.patch.age {
            user.age = age;
        }
        user.updated_at = self.updated_at;
    }
}
