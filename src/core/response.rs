//! 核心响应处理模块

use serde::Serialize;

/// API 响应结构 `{ mensaje, datos[, total][, filtros_aplicados] }`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    #[serde(rename = "mensaje")]
    pub message: String,
    #[serde(rename = "datos")]
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
    #[serde(rename = "filtros_aplicados", skip_serializing_if = "Option::is_none")]
    pub filters_applied: Option<serde_json::Value>,
}

impl<T> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data,
            total: None,
            filters_applied: None,
        }
    }

    pub fn with_filters(mut self, filters: serde_json::Value) -> Self {
        self.filters_applied = Some(filters);
        self
    }
}

impl<T> ApiResponse<Vec<T>> {
    /// 列表响应，附带元素总数
    pub fn list(message: impl Into<String>, data: Vec<T>) -> Self {
        let total = data.len();
        Self {
            message: message.into(),
            data,
            total: Some(total),
            filters_applied: None,
        }
    }
}
