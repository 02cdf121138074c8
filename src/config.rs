//! 应用配置
//!
//! 所有配置均来自环境变量，未设置时使用默认值。启动时如果存在 `.env`
//! 文件会先加载它。

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// 应用配置
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP 服务配置
    pub server: ServerConfig,
    /// 数据库配置
    pub database: DatabaseConfig,
    /// 日志配置
    pub logging: LoggingConfig,
    /// 存储后端
    pub storage: StorageBackend,
}

/// HTTP 服务配置
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// 绑定地址
    pub host: String,
    /// 监听端口
    pub port: u16,
    /// 浏览器客户端静态文件目录
    pub static_dir: PathBuf,
}

/// 文档数据库配置
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// 连接 URL
    pub url: String,
    /// 数据库名称
    pub name: String,
    /// 选择服务器的超时时间
    pub server_selection_timeout: Duration,
    /// 建立连接的超时时间
    pub connect_timeout: Duration,
}

/// 日志配置
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// 默认过滤指令，`RUST_LOG` 优先
    pub level: String,
}

/// 存储后端
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    MongoDb,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mongodb" | "mongo" => Ok(StorageBackend::MongoDb),
            "memory" | "memoria" => Ok(StorageBackend::Memory),
            other => Err(ConfigError::Validation(format!(
                "无效的存储后端: {}，有效值: mongodb, memory",
                other
            ))),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            static_dir: PathBuf::from("public"),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "mongodb://localhost:27017".to_string(),
            name: "aplicacion_crud".to_string(),
            server_selection_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            logging: LoggingConfig::default(),
            storage: StorageBackend::MongoDb,
        }
    }
}

impl Config {
    /// 从进程环境加载配置
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 通过任意查找函数加载配置，便于测试
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(url) = lookup("MONGODB_URL") {
            config.database.url = url;
        }
        if let Some(name) = lookup("DB_NAME") {
            config.database.name = name;
        }
        if let Some(host) = lookup("HOST") {
            config.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            config.server.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::Parse(format!("PORT 不是有效端口: {}", port)))?;
        }
        if let Some(dir) = lookup("STATIC_DIR") {
            config.server.static_dir = PathBuf::from(dir);
        }
        if let Some(storage) = lookup("STORAGE") {
            config.storage = storage.parse()?;
        }
        if let Some(level) = lookup("RUST_LOG") {
            config.logging.level = level;
        }

        config.validate()?;
        Ok(config)
    }

    /// 验证配置
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::Validation("MONGODB_URL 不能为空".to_string()));
        }
        if self.database.name.trim().is_empty() {
            return Err(ConfigError::Validation("DB_NAME 不能为空".to_string()));
        }
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::Validation("HOST 不能为空".to_string()));
        }
        Ok(())
    }

    /// 监听地址 `host:port`，主机名在绑定时解析
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("配置解析错误: {0}")]
    Parse(String),
    #[error("配置验证错误: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config.database.url, "mongodb://localhost:27017");
        assert_eq!(config.database.name, "aplicacion_crud");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.storage, StorageBackend::MongoDb);
        assert_eq!(config.database.server_selection_timeout, Duration::from_secs(5));
        assert_eq!(config.database.connect_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("MONGODB_URL", "mongodb://db:27017"),
            ("DB_NAME", "tienda"),
            ("PORT", "8080"),
            ("STORAGE", "memory"),
        ]))
        .unwrap();

        assert_eq!(config.database.url, "mongodb://db:27017");
        assert_eq!(config.database.name, "tienda");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let result = Config::from_lookup(lookup_from(&[("PORT", "tres mil")]));
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_empty_host_is_rejected() {
        let result = Config::from_lookup(lookup_from(&[("HOST", "  ")]));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[tokio::test]
    async fn test_host_name_is_resolved_when_binding() {
        let config =
            Config::from_lookup(lookup_from(&[("HOST", "localhost"), ("PORT", "0")])).unwrap();
        assert_eq!(config.bind_address(), "localhost:0");

        let listener = tokio::net::TcpListener::bind(config.bind_address())
            .await
            .unwrap();
        assert!(listener.local_addr().unwrap().ip().is_loopback());
    }

    #[test]
    fn test_invalid_storage_is_rejected() {
        let result = Config::from_lookup(lookup_from(&[("STORAGE", "redis")]));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }
}
