//! 核心错误处理模块
//!
//! 服务层返回带类型的 `CoreError`，处理器按错误种类映射 HTTP 状态码。

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};

use crate::infrastructure::database::StoreError;

/// 核心错误类型
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Errores de validación: {}", .errors.join(", "))]
    Validation {
        errors: Vec<String>,
        required_fields: Option<&'static [&'static str]>,
    },
    #[error("Datos inválidos en el cuerpo de la petición")]
    MalformedBody(String),
    #[error("{0}")]
    InvalidIdentifier(String),
    #[error("{0}")]
    DuplicateEmail(String),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CoreError {
    pub fn validation(errors: Vec<String>) -> Self {
        CoreError::Validation {
            errors,
            required_fields: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            CoreError::Validation { .. }
            | CoreError::MalformedBody(_)
            | CoreError::InvalidIdentifier(_)
            | CoreError::DuplicateEmail(_) => StatusCode::BAD_REQUEST,
            CoreError::NotFound(_) => StatusCode::NOT_FOUND,
            CoreError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for CoreError {
    fn from(rejection: JsonRejection) -> Self {
        CoreError::MalformedBody(rejection.body_text())
    }
}

/// 查询参数无法解析时按验证错误返回
impl From<QueryRejection> for CoreError {
    fn from(rejection: QueryRejection) -> Self {
        CoreError::validation(vec![rejection.body_text()])
    }
}

/// 错误响应结构
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(rename = "errores", skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    #[serde(rename = "campos_requeridos", skip_serializing_if = "Option::is_none")]
    pub required_fields: Option<Vec<String>>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            errors: None,
            required_fields: None,
        }
    }
}

impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            CoreError::Validation {
                errors,
                required_fields,
            } => {
                warn!("验证失败: {}", self);
                ErrorResponse {
                    error: self.to_string(),
                    errors: Some(errors.clone()),
                    required_fields: required_fields
                        .map(|fields| fields.iter().map(|f| f.to_string()).collect()),
                }
            }
            CoreError::MalformedBody(detail) => {
                warn!("请求体无效: {}", detail);
                ErrorResponse::new(self.to_string())
            }
            CoreError::InvalidIdentifier(_)
            | CoreError::DuplicateEmail(_)
            | CoreError::NotFound(_) => {
                warn!("{} - {}", status, self);
                ErrorResponse::new(self.to_string())
            }
            CoreError::Store(err) => {
                error!("存储错误: {}", err);
                ErrorResponse::new("Error interno del servidor")
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping_by_kind() {
        assert_eq!(
            CoreError::validation(vec!["x".into()]).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            CoreError::InvalidIdentifier("ID inválido".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            CoreError::DuplicateEmail("El email ya está registrado".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            CoreError::NotFound("Usuario no encontrado".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            CoreError::Store(StoreError::NotConnected).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_validation_message_joins_all_errors() {
        let err = CoreError::validation(vec![
            "nombre es requerido y debe ser una cadena no vacía".into(),
            "edad es requerida".into(),
        ]);
        assert_eq!(
            err.to_string(),
            "Errores de validación: nombre es requerido y debe ser una cadena no vacía, edad es requerida"
        );
    }
}
