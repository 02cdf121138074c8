//! 日志基础设施

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

pub struct Logger;

impl Logger {
    /// 初始化全局日志订阅者，`RUST_LOG` 的语法同样适用于 `level`
    pub fn init(config: &LoggingConfig) {
        let filter = EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new("info"));

        // 重复初始化（例如测试中）时忽略错误
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init();
    }
}
