//! 宽松的字段解析
//!
//! 数值字段既可以是 JSON 数字，也可以是以数字开头的字符串（如 `"30"`、
//! `"12.5kg"`），与浏览器表单提交的数据保持兼容。

use serde_json::Value;

/// 解析整数；小数按截断处理
pub fn parse_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => leading_int(s),
        _ => None,
    }
}

/// 解析有限浮点数
pub fn parse_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => leading_float(s),
        _ => None,
    }
}

/// 非空字符串（去除首尾空白后）
pub fn non_empty_str(value: &Value) -> Option<&str> {
    value.as_str().map(str::trim).filter(|s| !s.is_empty())
}

fn leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }
    s[..end].parse().ok()
}

fn leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }

    let mut digits = 0;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        digits += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
            digits += 1;
        }
    }
    if digits == 0 {
        return None;
    }

    // 指数部分只有在后面跟着数字时才算数
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok().filter(|f| f.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_int_accepts_numbers_and_numeric_strings() {
        assert_eq!(parse_int(&json!(30)), Some(30));
        assert_eq!(parse_int(&json!(30.9)), Some(30));
        assert_eq!(parse_int(&json!("42")), Some(42));
        assert_eq!(parse_int(&json!("  7 años")), Some(7));
        assert_eq!(parse_int(&json!("-1")), Some(-1));
    }

    #[test]
    fn test_parse_int_rejects_non_numeric() {
        assert_eq!(parse_int(&json!("abc")), None);
        assert_eq!(parse_int(&json!("")), None);
        assert_eq!(parse_int(&json!(true)), None);
        assert_eq!(parse_int(&json!(null)), None);
        assert_eq!(parse_int(&json!([1])), None);
    }

    #[test]
    fn test_parse_float() {
        assert_eq!(parse_float(&json!(1.5)), Some(1.5));
        assert_eq!(parse_float(&json!("800.99")), Some(800.99));
        assert_eq!(parse_float(&json!("12.5kg")), Some(12.5));
        assert_eq!(parse_float(&json!("1e3")), Some(1000.0));
        assert_eq!(parse_float(&json!("2e")), Some(2.0));
        assert_eq!(parse_float(&json!(".5")), Some(0.5));
        assert_eq!(parse_float(&json!("Infinity")), None);
        assert_eq!(parse_float(&json!("NaN")), None);
        assert_eq!(parse_float(&json!("-")), None);
    }

    #[test]
    fn test_non_empty_str() {
        assert_eq!(non_empty_str(&json!("  Ana ")), Some("Ana"));
        assert_eq!(non_empty_str(&json!("   ")), None);
        assert_eq!(non_empty_str(&json!(5)), None);
    }
}
