//! 产品字段验证

use serde_json::{Map, Value};

use super::model::{ProductFields, ProductPatch};
use crate::app::WriteMode;
use crate::core::parse::{non_empty_str, parse_float, parse_int};

pub const REQUIRED_FIELDS: &[&str] = &["nombre", "precio", "categoria", "stock"];

fn check_name(value: Option<&Value>) -> Result<String, String> {
    value
        .and_then(non_empty_str)
        .map(str::to_string)
        .ok_or_else(|| "nombre es requerido y debe ser una cadena no vacía".to_string())
}

fn check_price(value: Option<&Value>) -> Result<f64, String> {
    match value {
        None | Some(Value::Null) => Err("precio es requerido".to_string()),
        Some(value) => parse_float(value)
            .filter(|price| *price >= 0.0)
            .ok_or_else(|| "precio debe ser un número no negativo".to_string()),
    }
}

fn check_category(value: Option<&Value>) -> Result<String, String> {
    value
        .and_then(non_empty_str)
        .map(str::to_string)
        .ok_or_else(|| "categoria es requerida y debe ser una cadena no vacía".to_string())
}

fn check_stock(value: Option<&Value>) -> Result<i64, String> {
    match value {
        None | Some(Value::Null) => Err("stock es requerido".to_string()),
        Some(value) => parse_int(value)
            .filter(|stock| *stock >= 0)
            .ok_or_else(|| "stock debe ser un número entero no negativo".to_string()),
    }
}

pub fn validate(body: &Map<String, Value>, mode: WriteMode) -> Result<ProductPatch, Vec<String>> {
    let mut errors = Vec::new();
    let mut patch = ProductPatch::default();

    if mode.checks(body, "nombre") {
        match check_name(body.get("nombre")) {
            Ok(name) => patch.name = Some(name),
            Err(e) => errors.push(e),
        }
    }
    if mode.checks(body, "precio") {
        match check_price(body.get("precio")) {
            Ok(price) => patch.price = Some(price),
            Err(e) => errors.push(e),
        }
    }
    if mode.checks(body, "categoria") {
        match check_category(body.get("categoria")) {
            Ok(category) => patch.category = Some(category),
            Err(e) => errors.push(e),
        }
    }
    if mode.checks(body, "stock") {
        match check_stock(body.get("stock")) {
            Ok(stock) => patch.stock = Some(stock),
            Err(e) => errors.push(e),
        }
    }

    if errors.is_empty() {
        Ok(patch)
    } else {
        Err(errors)
    }
}

pub fn validate_full(body: &Map<String, Value>) -> Result<ProductFields, Vec<String>> {
    let patch = validate(body, WriteMode::Full)?;
    match patch {
        ProductPatch {
            name: Some(name),
            price: Some(price),
            category: Some(category),
            stock: Some(stock),
        } => Ok(ProductFields {
            name,
            price,
            category,
            stock,
        }),
        _ => Err(vec!["Faltan campos requeridos".to_string()]),
    }
}

/// `PUT /productos/:id/stock` 只接收库存
pub fn validate_stock(value: Option<&Value>) -> Result<i64, String> {
    let stock = match value {
        None | Some(Value::Null) => None,
        Some(value) => parse_int(value).filter(|stock| *stock >= 0),
    };
    stock.ok_or_else(|| "Stock debe ser un número entero no negativo".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_full_validation_coerces_numeric_strings() {
        let fields = validate_full(&body(json!({
            "nombre": " Pen ",
            "precio": "1.5",
            "categoria": " Office ",
            "stock": "10"
        })))
        .unwrap();

        assert_eq!(
            fields,
            ProductFields {
                name: "Pen".to_string(),
                price: 1.5,
                category: "Office".to_string(),
                stock: 10,
            }
        );
    }

    #[test]
    fn test_full_validation_lists_every_missing_field() {
        let errors = validate_full(&body(json!({}))).unwrap_err();
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn test_zero_accepted_negative_rejected() {
        assert!(validate(&body(json!({ "precio": 0, "stock": 0 })), WriteMode::Partial).is_ok());

        let errors =
            validate(&body(json!({ "precio": -0.01, "stock": -1 })), WriteMode::Partial)
                .unwrap_err();
        assert_eq!(
            errors,
            vec![
                "precio debe ser un número no negativo",
                "stock debe ser un número entero no negativo",
            ]
        );
    }

    #[test]
    fn test_non_numeric_price_is_validation_error() {
        let errors = validate(&body(json!({ "precio": "gratis" })), WriteMode::Partial).unwrap_err();
        assert_eq!(errors, vec!["precio debe ser un número no negativo"]);
    }

    #[test]
    fn test_validate_stock() {
        assert_eq!(validate_stock(Some(&json!(5))), Ok(5));
        assert_eq!(validate_stock(Some(&json!("0"))), Ok(0));
        assert!(validate_stock(Some(&json!(-3))).is_err());
        assert!(validate_stock(None).is_err());
        assert!(validate_stock(Some(&json!("muchos"))).is_err());
    }
}
