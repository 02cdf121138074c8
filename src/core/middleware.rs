//! 核心中间件模块

use axum::{
    extract::Request,
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::any::Any;
use std::time::Instant;
use tower_http::cors::{self, CorsLayer};
use tracing::{error, info};
use uuid::Uuid;

use super::error::ErrorResponse;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// CORS 层：允许任意来源，OPTIONS 预检请求直接返回 200 空响应
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// 请求日志中间件
pub async fn request_logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let request_id = Uuid::new_v4().to_string();
    let method = req.method().clone();
    let uri = req.uri().clone();
    let user_agent = req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string());

    let mut response = next.run(req).await;
    let status = response.status();
    let duration = start.elapsed();

    info!(
        "[{}] {} {} - {} - {}ms - User-Agent: {:?}",
        request_id,
        method,
        uri,
        status,
        duration.as_millis(),
        user_agent
    );

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }

    response
}

/// 处理器 panic 时的兜底响应
pub fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "未知 panic".to_string()
    };
    error!("处理请求时发生未捕获错误: {}", detail);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new("Error interno del servidor")),
    )
        .into_response()
}

/// 未匹配路由
pub async fn not_found_fallback() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("Ruta no encontrada")),
    )
        .into_response()
}
