//! Bind values for generated clauses.
//!
//! [`Value`] is the value side of a [`FieldUpdate`](crate::FieldUpdate) and of
//! every generated [`Clause`](crate::Clause). Payload values arrive as loosely
//! typed JSON (a salary is a number, an equity may be the string `"0.1"`), so
//! the `ToSql` impl coerces to whatever parameter type Postgres inferred for
//! the placeholder instead of requiring the caller to match it exactly.

use bytes::BytesMut;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::error::Error;
use tokio_postgres::types::{IsNull, ToSql, Type, to_sql_checked};

/// A single bind value: string, number, boolean or null.
///
/// `Decimal` serializes as a JSON string and, being untagged, reads back as
/// `Text`. Text bound to a `NUMERIC` placeholder is parsed, so both forms
/// bind the same value; compare decimals after binding, not after a serde
/// round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Decimal(Decimal),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Value::Decimal(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl ToSql for Value {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            Value::Null => Ok(IsNull::Yes),
            Value::Bool(b) => b.to_sql_checked(ty, out),
            Value::Int(n) => {
                if *ty == Type::INT2 {
                    i16::try_from(*n)?.to_sql_checked(ty, out)
                } else if *ty == Type::INT4 {
                    i32::try_from(*n)?.to_sql_checked(ty, out)
                } else if *ty == Type::FLOAT4 {
                    (*n as f32).to_sql_checked(ty, out)
                } else if *ty == Type::FLOAT8 {
                    (*n as f64).to_sql_checked(ty, out)
                } else if *ty == Type::NUMERIC {
                    Decimal::from(*n).to_sql_checked(ty, out)
                } else if is_text(ty) {
                    n.to_string().to_sql_checked(ty, out)
                } else {
                    n.to_sql_checked(ty, out)
                }
            }
            Value::Float(f) => {
                if *ty == Type::FLOAT4 {
                    (*f as f32).to_sql_checked(ty, out)
                } else if *ty == Type::NUMERIC {
                    Decimal::try_from(*f)?.to_sql_checked(ty, out)
                } else if is_text(ty) {
                    f.to_string().to_sql_checked(ty, out)
                } else {
                    f.to_sql_checked(ty, out)
                }
            }
            Value::Text(s) => {
                if *ty == Type::NUMERIC {
                    s.trim().parse::<Decimal>()?.to_sql_checked(ty, out)
                } else {
                    s.as_str().to_sql_checked(ty, out)
                }
            }
            Value::Decimal(d) => {
                if is_text(ty) {
                    d.to_string().to_sql_checked(ty, out)
                } else {
                    d.to_sql_checked(ty, out)
                }
            }
        }
    }

    // Each variant delegates to a checked conversion in `to_sql`.
    fn accepts(_ty: &Type) -> bool {
        true
    }

    to_sql_checked!();
}

fn is_text(ty: &Type) -> bool {
    *ty == Type::TEXT || *ty == Type::VARCHAR || *ty == Type::BPCHAR || *ty == Type::NAME
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(value: &Value, ty: &Type) -> Result<(IsNull, Vec<u8>), Box<dyn Error + Sync + Send>> {
        let mut buf = BytesMut::new();
        let is_null = value.to_sql_checked(ty, &mut buf)?;
        Ok((is_null, buf.to_vec()))
    }

    #[test]
    fn int_narrows_to_int4() {
        let (_, bytes) = encode(&Value::Int(32), &Type::INT4).unwrap();
        assert_eq!(bytes, 32i32.to_be_bytes());
    }

    #[test]
    fn int_out_of_range_for_int4_errors() {
        assert!(encode(&Value::Int(i64::MAX), &Type::INT4).is_err());
    }

    #[test]
    fn null_encodes_as_sql_null() {
        let (is_null, bytes) = encode(&Value::Null, &Type::TEXT).unwrap();
        assert!(matches!(is_null, IsNull::Yes));
        assert!(bytes.is_empty());
    }

    #[test]
    fn text_to_numeric_parses() {
        assert!(encode(&Value::from("0.1"), &Type::NUMERIC).is_ok());
        assert!(encode(&Value::from("lots"), &Type::NUMERIC).is_err());
    }

    #[test]
    fn bool_into_int_column_is_rejected() {
        assert!(encode(&Value::Bool(true), &Type::INT4).is_err());
    }

    #[test]
    fn deserializes_json_scalars() {
        let values: Vec<Value> = serde_json::from_str(r#"[null, true, 32, 1.5, "Aliya"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                Value::Null,
                Value::Bool(true),
                Value::Int(32),
                Value::Float(1.5),
                Value::from("Aliya"),
            ]
        );
    }

    #[test]
    fn decimal_reads_back_as_text_and_binds_identically() {
        let decimal = Value::Decimal(Decimal::new(25, 2));
        let json = serde_json::to_string(&decimal).unwrap();
        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Value::from("0.25"));

        let (_, original) = encode(&decimal, &Type::NUMERIC).unwrap();
        let (_, reparsed) = encode(&back, &Type::NUMERIC).unwrap();
        assert_eq!(original, reparsed);
    }

    #[test]
    fn option_maps_to_null() {
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some(7)), Value::Int(7));
    }
}
