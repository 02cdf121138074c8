//! 用户字段验证
//!
//! 所有违规信息累积后一起返回，而不是遇到第一个错误就停止。

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

use super::model::{UserFields, UserPatch};
use crate::app::WriteMode;
use crate::core::parse::{non_empty_str, parse_int};

pub const REQUIRED_FIELDS: &[&str] = &["nombre", "email", "edad"];

pub const MIN_AGE: i64 = 0;
pub const MAX_AGE: i64 = 150;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("邮箱正则表达式无效"))
}

pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// 邮箱统一为去空白的小写形式
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn check_name(value: Option<&Value>) -> Result<String, String> {
    value
        .and_then(non_empty_str)
        .map(str::to_string)
        .ok_or_else(|| "nombre es requerido y debe ser una cadena no vacía".to_string())
}

fn check_email(value: Option<&Value>) -> Result<String, String> {
    match value.and_then(Value::as_str) {
        Some(email) if !email.is_empty() => {
            if is_valid_email(email) {
                Ok(normalize_email(email))
            } else {
                Err("email debe tener un formato válido".to_string())
            }
        }
        _ => Err("email es requerido y debe ser una cadena".to_string()),
    }
}

fn check_age(value: Option<&Value>) -> Result<i64, String> {
    match value {
        None | Some(Value::Null) => Err("edad es requerida".to_string()),
        Some(value) => parse_int(value)
            .filter(|age| (MIN_AGE..=MAX_AGE).contains(age))
            .ok_or_else(|| "edad debe ser un número entre 0 y 150".to_string()),
    }
}

/// 按写入模式验证请求体：`Full` 要求所有字段，`Partial` 只检查出现的字段
pub fn validate(body: &Map<String, Value>, mode: WriteMode) -> Result<UserPatch, Vec<String>> {
    let mut errors = Vec::new();
    let mut patch = UserPatch::default();

    if mode.checks(body, "nombre") {
        match check_name(body.get("nombre")) {
            Ok(name) => patch.name = Some(name),
            Err(e) => errors.push(e),
        }
    }
    if mode.checks(body, "email") {
        match check_email(body.get("email")) {
            Ok(email) => patch.email = Some(email),
            Err(e) => errors.push(e),
        }
    }
    if mode.checks(body, "edad") {
        match check_age(body.get("edad")) {
            Ok(age) => patch.age = Some(age),
            Err(e) => errors.push(e),
        }
    }

    if errors.is_empty() {
        Ok(patch)
    } else {
        Err(errors)
    }
}

/// 创建与整体替换时使用，所有字段都必须有效
pub fn validate_full(body: &Map<String, Value>) -> Result<UserFields, Vec<String>> {
    let patch = validate(body, WriteMode::Full)?;
    match patch {
        UserPatch {
            name: Some(name),
            email: Some(email),
            age: Some(age),
        } => Ok(UserFields { name, email, age }),
        _ => Err(vec!["Faltan campos requeridos".to_string()]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_full_validation_normalizes_fields() {
        let fields = validate_full(&body(json!({
            "nombre": "  Ana  ",
            "email": "Ana@Correo.COM",
            "edad": "30"
        })))
        .unwrap();

        assert_eq!(
            fields,
            UserFields {
                name: "Ana".to_string(),
                email: "ana@correo.com".to_string(),
                age: 30,
            }
        );
    }

    #[test]
    fn test_full_validation_accumulates_errors() {
        let errors = validate_full(&body(json!({}))).unwrap_err();
        assert_eq!(
            errors,
            vec![
                "nombre es requerido y debe ser una cadena no vacía",
                "email es requerido y debe ser una cadena",
                "edad es requerida",
            ]
        );
    }

    #[test]
    fn test_age_boundaries() {
        for (age, ok) in [(0, true), (150, true), (-1, false), (151, false)] {
            let result = validate(&body(json!({ "edad": age })), WriteMode::Partial);
            assert_eq!(result.is_ok(), ok, "edad {}", age);
        }
    }

    #[test]
    fn test_invalid_email_format() {
        for email in ["sin-arroba.com", "a@b", "a b@c.com", "@x.com"] {
            let errors =
                validate(&body(json!({ "email": email })), WriteMode::Partial).unwrap_err();
            assert_eq!(errors, vec!["email debe tener un formato válido"], "{}", email);
        }
    }

    #[test]
    fn test_partial_only_checks_supplied_fields() {
        let patch = validate(&body(json!({ "edad": 41 })), WriteMode::Partial).unwrap();
        assert_eq!(
            patch,
            UserPatch {
                age: Some(41),
                ..UserPatch::default()
            }
        );

        let empty = validate(&body(json!({})), WriteMode::Partial).unwrap();
        assert_eq!(empty, UserPatch::default());
    }

    #[test]
    fn test_partial_rejects_supplied_empty_or_null() {
        let errors = validate(
            &body(json!({ "nombre": "", "edad": null })),
            WriteMode::Partial,
        )
        .unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
