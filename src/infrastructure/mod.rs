//! 基础设施层：日志与文档数据库连接

pub mod database;
pub mod logger;
