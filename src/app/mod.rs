//! 应用层：用户与产品两个资源

pub mod products;
pub mod routes;
pub mod seed;
pub mod users;

use serde_json::{Map, Value};
use std::sync::Arc;

use crate::infrastructure::database::{MongoConnector, StoreError};
use products::{
    memory::MemoryProductRepository, mongo::MongoProductRepository, service::ProductService,
};
use users::{memory::MemoryUserRepository, mongo::MongoUserRepository, service::UserService};

/// 写入模式：创建/整体替换检查所有字段，部分更新只检查出现的字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Full,
    Partial,
}

impl WriteMode {
    pub fn checks(self, body: &Map<String, Value>, key: &str) -> bool {
        self == WriteMode::Full || body.contains_key(key)
    }
}

#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
    pub products: ProductService,
    /// 内存后端没有连接器
    pub connector: Option<Arc<MongoConnector>>,
}

impl AppState {
    /// 内存后端，进程退出即丢失数据
    pub fn in_memory() -> Self {
        Self {
            users: UserService::new(Arc::new(MemoryUserRepository::new())),
            products: ProductService::new(Arc::new(MemoryProductRepository::new())),
            connector: None,
        }
    }

    /// MongoDB 后端；连接器必须已经打开
    pub async fn mongo(connector: Arc<MongoConnector>) -> Result<Self, StoreError> {
        let database = connector.database().await?;
        Ok(Self {
            users: UserService::new(Arc::new(MongoUserRepository::new(&database))),
            products: ProductService::new(Arc::new(MongoProductRepository::new(&database))),
            connector: Some(connector),
        })
    }

    /// 存储是否可用
    pub async fn storage_alive(&self) -> bool {
        match &self.connector {
            Some(connector) => connector.ping().await,
            None => true,
        }
    }
}
