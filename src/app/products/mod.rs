//! 产品管理

pub mod handler;
pub mod memory;
pub mod model;
pub mod mongo;
pub mod repository;
pub mod service;
pub mod validation;

use axum::{
    routing::{get, put},
    Router,
};

use super::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/productos",
            get(handler::list_products).post(handler::create_product),
        )
        .route(
            "/productos/categoria/:categoria",
            get(handler::list_by_category),
        )
        .route(
            "/productos/:id",
            get(handler::get_product)
                .put(handler::replace_product)
                .patch(handler::patch_product)
                .delete(handler::delete_product),
        )
        .route("/productos/:id/stock", put(handler::update_stock))
}
