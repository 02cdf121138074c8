//! 产品处理器

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::Json,
};
use serde_json::{Map, Value};

use super::model::{Product, ProductQuery};
use super::service::INVALID_ID;
use crate::app::AppState;
use crate::core::{error::CoreError, response::ApiResponse};

type Body = Result<Json<Map<String, Value>>, JsonRejection>;

type IdPath = Result<Path<String>, PathRejection>;

fn not_found() -> CoreError {
    CoreError::NotFound("Producto no encontrado".to_string())
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

/// 获取所有产品 (支持查询过滤)
pub async fn list_products(
    State(state): State<AppState>,
    query: Result<Query<ProductQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<Product>>>, CoreError> {
    let Query(query) = query?;
    let filter = query.to_filter()?;
    let products = state.products.list_all(&filter).await?;
    Ok(Json(
        ApiResponse::list("Lista de productos obtenida exitosamente", products)
            .with_filters(query.applied()),
    ))
}

pub async fn get_product(
    State(state): State<AppState>,
    path: IdPath,
) -> Result<Json<ApiResponse<Product>>, CoreError> {
    let id = read_id(path)?;
    let product = state.products.get_by_id(&id).await?.ok_or_else(not_found)?;
    Ok(Json(ApiResponse::success("Producto encontrado", product)))
}

pub async fn list_by_category(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<ApiResponse<Vec<Product>>>, CoreError> {
    let Path(category) = path.map_err(|_| {
        CoreError::validation(vec!["categoria debe ser un texto válido".to_string()])
    })?;
    let products = state.products.get_by_category(&category).await?;
    Ok(Json(ApiResponse::list(
        format!("Productos de la categoría \"{}\"", category),
        products,
    )))
}

pub async fn create_product(
    State(state): State<AppState>,
    payload: Body,
) -> Result<(StatusCode, Json<ApiResponse<Product>>), CoreError> {
    let Json(body) = payload?;
    let product = state.products.create(&body).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Producto creado exitosamente", product)),
    ))
}

pub async fn replace_product(
    State(state): State<AppState>,
    path: IdPath,
    payload: Body,
) -> Result<Json<ApiResponse<Product>>, CoreError> {
    let id = write_id(path)?;
    let Json(body) = payload?;
    let product = state
        .products
        .replace(&id, &body)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(ApiResponse::success(
        "Producto actualizado exitosamente",
        product,
    )))
}

pub async fn patch_product(
    State(state): State<AppState>,
    path: IdPath,
    payload: Body,
) -> Result<Json<ApiResponse<Product>>, CoreError> {
    let id = write_id(path)?;
    let Json(body) = payload?;
    let product = state
        .products
        .update(&id, &body)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(ApiResponse::success(
        "Producto actualizado parcialmente",
        product,
    )))
}

pub async fn update_stock(
    State(state): State<AppState>,
    path: IdPath,
    payload: Body,
) -> Result<Json<ApiResponse<Product>>, CoreError> {
    let id = write_id(path)?;
    let Json(body) = payload?;
    let product = state
        .products
        .update_stock(&id, body.get("stock"))
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(ApiResponse::success(
        "Stock actualizado exitosamente",
        product,
    )))
}

pub async fn delete_product(
    State(state): State<AppState>,
    path: IdPath,
) -> Result<Json<ApiResponse<Product>>, CoreError> {
    let id = read_id(path)?;
    let product = state.products.delete(&id).await?.ok_or_else(not_found)?;
    Ok(Json(ApiResponse::success(
        "Producto eliminado exitosamente",
        product,
    )))
}
