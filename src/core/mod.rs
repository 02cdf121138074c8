//! 核心层：错误处理、响应封装、中间件与数值解析

pub mod error;
pub mod middleware;
pub mod parse;
pub mod response;
