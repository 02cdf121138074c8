//! 用户处理器

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::Json,
};
use serde_json::{Map, Value};

use super::model::User;
use super::service::INVALID_ID;
use crate::app::AppState;
use crate::core::{error::CoreError, response::ApiResponse};

type Body = Result<Json<Map<String, Value>>, JsonRejection>;

type IdPath = Result<Path<String>, PathRejection>;

fn not_found() -> CoreError {
    CoreError::NotFound("Usuario no encontrado".to_string())
}

/// 读取与删除：无法解码的 ID 与不存在的记录一样是 404
fn read_id(path: IdPath) -> Result<String, CoreError> {
    path.map(|Path(id)| id).map_err(|_| not_found())
}

/// 写入：无法解码的 ID 是 400
fn write_id(path: IdPath) -> Result<String, CoreError> {
    path.map(|Path(id)| id)
        .map_err(|_| CoreError::InvalidIdentifier(INVALID_ID.to_string()))
}

pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<User>>>, CoreError> {
    let users = state.users.list_all().await?;
    Ok(Json(ApiResponse::list(
        "Lista de usuarios obtenida exitosamente",
        users,
    )))
}

pub async fn get_user(
    State(state): State<AppState>,
    path: IdPath,
) -> Result<Json<ApiResponse<User>>, CoreError> {
    let id = read_id(path)?;
    let user = state.users.get_by_id(&id).await?.ok_or_else(not_found)?;
    Ok(Json(ApiResponse::success("Usuario encontrado", user)))
}

pub async fn create_user(
    State(state): State<AppState>,
    payload: Body,
) -> Result<(StatusCode, Json<ApiResponse<User>>), CoreError> {
    let Json(body) = payload?;
    let user = state.users.create(&body).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Usuario creado exitosamente", user)),
    ))
}

pub async fn replace_user(
    State(state): State<AppState>,
    path: IdPath,
    payload: Body,
) -> Result<Json<ApiResponse<User>>, CoreError> {
    let id = write_id(path)?;
    let Json(body) = payload?;
    let user = state.users.replace(&id, &body).await?.ok_or_else(not_found)?;
    Ok(Json(ApiResponse::success(
        "Usuario actualizado exitosamente",
        user,
    )))
}

pub async fn patch_user(
    State(state): State<AppState>,
    path: IdPath,
    payload: Body,
) -> Result<Json<ApiResponse<User>>, CoreError> {
    let id = write_id(path)?;
    let Json(body) = payload?;
    let user = state.users.update(&id, &body).await?.ok_or_else(not_found)?;
    Ok(Json(ApiResponse::success(
        "Usuario actualizado parcialmente",
        user,
    )))
}

pub async fn delete_user(
    State(state): State<AppState>,
    path: IdPath,
) -> Result<Json<ApiResponse<User>>, CoreError> {
    let id = read_id(path)?;
    let user = state.users.delete(&id).await?.ok_or_else(not_found)?;
    Ok(Json(ApiResponse::success(
        "Usuario eliminado exitosamente",
        user,
    )))
}
