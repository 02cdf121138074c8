//! 用户管理

pub mod handler;
pub mod memory;
pub mod model;
pub mod mongo;
pub mod repository;
pub mod service;
pub mod validation;

use axum::{routing::get, Router};

use super::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/usuarios",
            get(handler::list_users).post(handler::create_user),
        )
        .route(
            "/usuarios/:id",
            get(handler::get_user)
                .put(handler::replace_user)
                .patch(handler::patch_user)
                .delete(handler::delete_user),
        )
}
