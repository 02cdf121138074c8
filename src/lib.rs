//! # 用户与产品 CRUD API
//!
//! 基于 Axum 的 REST 服务，数据存放在 MongoDB（也可切换为内存存储）：
//! - `app`：用户与产品的模型、验证、存储和处理器
//! - `core`：错误处理、响应封装与中间件
//! - `infrastructure`：日志与数据库连接
//! - `config`：环境变量配置

pub mod app;
pub mod config;
pub mod core;
pub mod infrastructure;

use axum::{middleware, Router};
use std::path::Path;
use tower_http::{catch_panic::CatchPanicLayer, services::ServeDir};

use crate::app::AppState;
use crate::core::middleware::{
    cors_layer, handle_panic, not_found_fallback, request_logging_middleware,
};

/// 组装完整的应用路由
///
/// 中间件由外到内依次为：panic 兜底、CORS、请求日志。
pub fn build_router(state: AppState, static_dir: Option<&Path>) -> Router {
    let mut router = app::routes::api_routes();

    if let Some(dir) = static_dir {
        router = router.nest_service("/app", ServeDir::new(dir));
    }

    // 路径存在但方法不支持时同样按未匹配路由处理
    router
        .method_not_allowed_fallback(not_found_fallback)
        .fallback(not_found_fallback)
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(cors_layer())
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state)
}
