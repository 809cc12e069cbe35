//! Coercing checks for values that arrive as strings.
//!
//! Environment variables and command-line flags only carry text. These checks
//! accept the native JSON value or its string form and normalize to the native
//! value.

use crate::Check;
use serde_json::{Number, Value};

/// Accept an integer or a string holding one.
pub fn integer() -> Check {
    Check::transform("integer", |value| match value {
        Value::Number(number) if number.is_i64() || number.is_u64() => Ok(value.clone()),
        Value::String(text) => {
            let text = text.trim();
            if let Ok(number) = text.parse::<i64>() {
                Ok(Value::from(number))
            } else if let Ok(number) = text.parse::<u64>() {
                Ok(Value::from(number))
            } else {
                Err(cannot_convert(value, "integer"))
            }
        }
        _ => Err(cannot_convert(value, "integer")),
    })
}

/// Accept any number or a string holding one.
pub fn number() -> Check {
    Check::transform("number", |value| match value {
        Value::Number(_) => Ok(value.clone()),
        Value::String(text) => text
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| cannot_convert(value, "number")),
        _ => Err(cannot_convert(value, "number")),
    })
}

/// Accept a bool, `0`/`1`, or the usual textual spellings.
pub fn boolean() -> Check {
    Check::transform("boolean", |value| match value {
        Value::Bool(_) => Ok(value.clone()),
        Value::Number(number) => match number.as_u64() {
            Some(0) => Ok(Value::Bool(false)),
            Some(1) => Ok(Value::Bool(true)),
            _ => Err(cannot_convert(value, "bool")),
        },
        Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(Value::Bool(true)),
            "false" | "no" | "off" | "0" => Ok(Value::Bool(false)),
            _ => Err(cannot_convert(value, "bool")),
        },
        _ => Err(cannot_convert(value, "bool")),
    })
}

/// Accept a string, or render a number or bool as one.
pub fn string() -> Check {
    Check::transform("string", |value| match value {
        Value::String(_) => Ok(value.clone()),
        Value::Number(number) => Ok(Value::String(number.to_string())),
        Value::Bool(flag) => Ok(Value::String(flag.to_string())),
        _ => Err(cannot_convert(value, "string")),
    })
}

fn cannot_convert(value: &Value, target: &str) -> String {
    format!("cannot convert {value} to {target}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn integer_parses_strings() {
        assert_eq!(integer().run(json!(" 8080 ")), Ok(json!(8080)));
        assert_eq!(integer().run(json!(-2)), Ok(json!(-2)));
        assert_eq!(
            integer().run(json!("80a")),
            Err(r#"cannot convert "80a" to integer"#.to_string())
        );
        assert_eq!(
            integer().run(json!(1.5)),
            Err("cannot convert 1.5 to integer".to_string())
        );
    }

    #[test]
    fn number_parses_strings() {
        assert_eq!(number().run(json!("2.5")), Ok(json!(2.5)));
        assert_eq!(number().run(json!(7)), Ok(json!(7)));
        assert!(number().run(json!("NaN")).is_err());
    }

    #[test]
    fn boolean_accepts_common_spellings() {
        assert_eq!(boolean().run(json!("Yes")), Ok(json!(true)));
        assert_eq!(boolean().run(json!("off")), Ok(json!(false)));
        assert_eq!(boolean().run(json!(1)), Ok(json!(true)));
        assert!(boolean().run(json!("maybe")).is_err());
    }

    #[test]
    fn string_renders_scalars() {
        assert_eq!(string().run(json!(12)), Ok(json!("12")));
        assert_eq!(string().run(json!(false)), Ok(json!("false")));
        assert!(string().run(json!([1])).is_err());
    }
}
