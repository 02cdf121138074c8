//! 数据库基础设施
//!
//! `MongoConnector` 持有唯一的客户端与数据库句柄。它在启动时由 `main`
//! 创建并打开，以 `Arc` 的形式交给各个仓库，关闭信号到来时再显式关闭。

use chrono::{DateTime, Utc};
use mongodb::{
    bson::{doc, DateTime as BsonDateTime},
    error::{ErrorKind, WriteFailure},
    options::{ClientOptions, IndexOptions},
    Client, Database, IndexModel,
};
use tokio::sync::RwLock;
use tracing::{error, info};

use crate::config::DatabaseConfig;

/// MongoDB 重复键错误码
const DUPLICATE_KEY_CODE: i32 = 11000;

/// 存储层错误
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("无法连接到数据库: {0}")]
    Connection(#[source] mongodb::error::Error),
    #[error("数据库未连接，请先调用 connect()")]
    NotConnected,
    #[error("唯一键冲突: {0}")]
    DuplicateKey(String),
    #[error("数据库操作失败: {0}")]
    Driver(#[source] mongodb::error::Error),
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        if is_duplicate_key(&err) {
            StoreError::DuplicateKey(err.to_string())
        } else {
            StoreError::Driver(err)
        }
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => {
            write_error.code == DUPLICATE_KEY_CODE
        }
        ErrorKind::Command(command_error) => command_error.code == DUPLICATE_KEY_CODE,
        _ => false,
    }
}

struct Connection {
    client: Client,
    database: Database,
}

pub struct MongoConnector {
    config: DatabaseConfig,
    state: RwLock<Option<Connection>>,
}

impl MongoConnector {
    pub fn new(config: DatabaseConfig) -> Self {
        Self {
            config,
            state: RwLock::new(None),
        }
    }

    /// 打开连接；已连接时直接复用现有句柄
    pub async fn connect(&self) -> Result<Database, StoreError> {
        let mut state = self.state.write().await;
        if let Some(connection) = state.as_ref() {
            return Ok(connection.database.clone());
        }

        info!("连接 MongoDB: {}", redact_url(&self.config.url));

        let mut options = ClientOptions::parse(&self.config.url)
            .await
            .map_err(StoreError::Connection)?;
        options.server_selection_timeout = Some(self.config.server_selection_timeout);
        options.connect_timeout = Some(self.config.connect_timeout);

        let client = Client::with_options(options).map_err(StoreError::Connection)?;
        let database = client.database(&self.config.name);

        // 驱动是惰性连接的，用 ping 确认服务器可达
        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(StoreError::Connection)?;

        info!("已连接 MongoDB，使用数据库: {}", self.config.name);

        *state = Some(Connection {
            client,
            database: database.clone(),
        });
        Ok(database)
    }

    /// 获取已打开的数据库句柄
    pub async fn database(&self) -> Result<Database, StoreError> {
        self.state
            .read()
            .await
            .as_ref()
            .map(|connection| connection.database.clone())
            .ok_or(StoreError::NotConnected)
    }

    pub async fn is_connected(&self) -> bool {
        self.state.read().await.is_some()
    }

    /// 关闭连接，未连接时什么也不做
    pub async fn close(&self) {
        let connection = self.state.write().await.take();
        if let Some(connection) = connection {
            connection.client.shutdown().await;
            info!("MongoDB 连接已关闭");
        }
    }

    /// 存活检查，失败时记录日志并返回 false
    pub async fn ping(&self) -> bool {
        let database = match self.connect().await {
            Ok(database) => database,
            Err(err) => {
                error!("数据库连接检查失败: {}", err);
                return false;
            }
        };

        match database.run_command(doc! { "ping": 1 }).await {
            Ok(_) => true,
            Err(err) => {
                error!("数据库连接检查失败: {}", err);
                false
            }
        }
    }

    /// 创建 `usuarios.email` 唯一索引，邮箱唯一性以它为准
    pub async fn ensure_indexes(&self) -> Result<(), StoreError> {
        let database = self.database().await?;
        let index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("email_unico".to_string())
                    .build(),
            )
            .build();

        database
            .collection::<mongodb::bson::Document>(crate::app::users::mongo::COLLECTION)
            .create_index(index)
            .await?;
        Ok(())
    }
}

pub fn to_bson_datetime(value: DateTime<Utc>) -> BsonDateTime {
    BsonDateTime::from_millis(value.timestamp_millis())
}

pub fn from_bson_datetime(value: BsonDateTime) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(value.timestamp_millis()).unwrap_or_default()
}

/// 隐藏连接串中的凭据
fn redact_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end + 3 => {
            format!("{}***{}", &url[..scheme_end + 3], &url[at..])
        }
        _ => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_database_before_connect_is_not_connected() {
        let connector = MongoConnector::new(DatabaseConfig::default());
        assert!(matches!(
            connector.database().await,
            Err(StoreError::NotConnected)
        ));
        assert!(!connector.is_connected().await);
    }

    #[tokio::test]
    async fn test_close_without_connect_is_noop() {
        let connector = MongoConnector::new(DatabaseConfig::default());
        connector.close().await;
        connector.close().await;
        assert!(!connector.is_connected().await);
    }

    #[tokio::test]
    async fn test_invalid_url_fails_with_connection_error() {
        let connector = MongoConnector::new(DatabaseConfig {
            url: "no-es-una-url".to_string(),
            ..DatabaseConfig::default()
        });
        assert!(matches!(
            connector.connect().await,
            Err(StoreError::Connection(_))
        ));
        assert!(!connector.ping().await);
    }

    #[test]
    fn test_redact_url_hides_credentials() {
        assert_eq!(
            redact_url("mongodb://admin:secreto@db:27017"),
            "mongodb://***@db:27017"
        );
        assert_eq!(redact_url("mongodb://localhost:27017"), "mongodb://localhost:27017");
    }
}
