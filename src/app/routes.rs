//! 路由装配

use axum::{extract::State, http::StatusCode, response::Json, routing::get, Router};
use serde_json::{json, Value};

use super::{products, users, AppState};

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(api_info))
        .route("/salud", get(health_check))
        .merge(users::routes())
        .merge(products::routes())
}

/// API 信息
async fn api_info() -> Json<Value> {
    Json(json!({
        "mensaje": "¡Bienvenido a la API CRUD!",
        "version": env!("CARGO_PKG_VERSION"),
        "rutas_disponibles": {
            "usuarios": "/usuarios",
            "productos": "/productos"
        }
    }))
}

/// 健康检查
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    if state.storage_alive().await {
        (
            StatusCode::OK,
            Json(json!({ "estado": "ok", "base_datos": true })),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "estado": "degradado", "base_datos": false })),
        )
    }
}
