//! Raw request values and the values bound to `$N` placeholders.

use bytes::BytesMut;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::str::FromStr;
use tokio_postgres::types::{IsNull, ToSql, Type, to_sql_checked};

/// A raw filter value as received from a query string or a JSON body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl FilterValue {
    /// Whether this value switches a flag filter on.
    ///
    /// Query strings carry booleans as text, so `"true"` counts as well.
    pub fn as_flag(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Text(s) => s.trim().eq_ignore_ascii_case("true"),
            Self::Int(_) | Self::Float(_) => false,
        }
    }

    /// Parse the value as an integer.
    ///
    /// Text uses leading-prefix semantics: `"120abc"` parses as `120`, while
    /// `"abc"` does not parse. A JSON number parses only when it is whole,
    /// since a fractional bound could never bind to an integer column.
    /// Booleans never parse.
    pub fn parse_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            Self::Float(f) if f.is_finite() && f.fract() == 0.0 => Some(*f as i64),
            Self::Float(_) | Self::Bool(_) => None,
            Self::Text(s) => parse_int_prefix(s),
        }
    }

    /// Render the value as text.
    pub fn to_text(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Int(n) => n.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Parse the leading integer of `s`, ignoring anything after the digits.
///
/// A digit run too large for `i64` does not parse.
pub(crate) fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let sign_len = usize::from(matches!(s.as_bytes().first(), Some(b'-' | b'+')));
    let digits_len = s[sign_len..].bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }
    s[..sign_len + digits_len].parse().ok()
}

/// The leading decimal number of `s` (`[+-]digits[.digits]`), if any.
///
/// Numeric text binds through this prefix whatever the column type, so
/// `"12.5kg"` reaches a NUMERIC column as `12.5` and an INTEGER one as `12`.
fn decimal_prefix(s: &str) -> Option<&str> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = usize::from(matches!(bytes.first(), Some(b'-' | b'+')));
    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    if end == int_start {
        return None;
    }
    if bytes.get(end) == Some(&b'.') && bytes.get(end + 1).is_some_and(u8::is_ascii_digit) {
        end += 1;
        while bytes.get(end).is_some_and(u8::is_ascii_digit) {
            end += 1;
        }
    }
    Some(&s[..end])
}

/// A value bound positionally to a `$N` placeholder.
///
/// Integers, floats and text are converted to whatever parameter type
/// Postgres inferred for the placeholder, so a query-string `"50000"` can be
/// bound to an `INTEGER` column the same way a JSON `50000` can.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Json(serde_json::Value),
}

impl BoundValue {
    fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Json(_) => "json",
        }
    }

    fn mismatch(&self, ty: &Type) -> Box<dyn Error + Sync + Send> {
        format!("cannot bind {} value to a {} parameter", self.kind(), ty).into()
    }
}

impl fmt::Display for BoundValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => write!(f, "{s:?}"),
            Self::Json(v) => write!(f, "{v}"),
        }
    }
}

impl From<FilterValue> for BoundValue {
    fn from(value: FilterValue) -> Self {
        match value {
            FilterValue::Bool(b) => Self::Bool(b),
            FilterValue::Int(n) => Self::Int(n),
            FilterValue::Float(f) => Self::Float(f),
            FilterValue::Text(s) => Self::Text(s),
        }
    }
}

impl From<&serde_json::Value> for BoundValue {
    fn from(value: &serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => Self::Text(s.clone()),
            other => Self::Json(other.clone()),
        }
    }
}

impl From<&str> for BoundValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for BoundValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for BoundValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for BoundValue {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<f64> for BoundValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for BoundValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl<T: Into<BoundValue>> From<Option<T>> for BoundValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl ToSql for BoundValue {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            Self::Null => Ok(IsNull::Yes),
            Self::Bool(b) => match *ty {
                Type::BOOL => b.to_sql(ty, out),
                _ => Err(self.mismatch(ty)),
            },
            Self::Int(n) => int_to_sql(*n, ty, out),
            Self::Float(f) => match *ty {
                Type::FLOAT8 => f.to_sql(ty, out),
                Type::FLOAT4 => (*f as f32).to_sql(ty, out),
                Type::NUMERIC => Decimal::try_from(*f)?.to_sql(ty, out),
                Type::INT2 | Type::INT4 | Type::INT8 if f.fract() == 0.0 => {
                    int_to_sql(*f as i64, ty, out)
                }
                Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::UNKNOWN => {
                    f.to_string().to_sql(ty, out)
                }
                _ => Err(self.mismatch(ty)),
            },
            Self::Text(s) => match *ty {
                Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME | Type::UNKNOWN => {
                    s.as_str().to_sql(ty, out)
                }
                Type::INT2 | Type::INT4 | Type::INT8 => match parse_int_prefix(s) {
                    Some(n) => int_to_sql(n, ty, out),
                    None => Err(format!("not an integer: {s:?}").into()),
                },
                Type::FLOAT8 | Type::FLOAT4 | Type::NUMERIC => match decimal_prefix(s) {
                    Some(num) if *ty == Type::FLOAT8 => num.parse::<f64>()?.to_sql(ty, out),
                    Some(num) if *ty == Type::FLOAT4 => num.parse::<f32>()?.to_sql(ty, out),
                    Some(num) => Decimal::from_str(num)?.to_sql(ty, out),
                    None => Err(format!("not a number: {s:?}").into()),
                },
                Type::BOOL => s.trim().parse::<bool>()?.to_sql(ty, out),
                _ => Err(self.mismatch(ty)),
            },
            Self::Json(v) => match *ty {
                Type::JSON | Type::JSONB => v.to_sql(ty, out),
                _ => Err(self.mismatch(ty)),
            },
        }
    }

    fn accepts(ty: &Type) -> bool {
        matches!(
            *ty,
            Type::BOOL
                | Type::INT2
                | Type::INT4
                | Type::INT8
                | Type::FLOAT4
                | Type::FLOAT8
                | Type::NUMERIC
                | Type::TEXT
                | Type::VARCHAR
                | Type::BPCHAR
                | Type::NAME
                | Type::UNKNOWN
                | Type::JSON
                | Type::JSONB
        )
    }

    to_sql_checked!();
}

fn int_to_sql(n: i64, ty: &Type, out: &mut BytesMut) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
    match *ty {
        Type::INT2 => i16::try_from(n)?.to_sql(ty, out),
        Type::INT4 => i32::try_from(n)?.to_sql(ty, out),
        Type::INT8 => n.to_sql(ty, out),
        Type::FLOAT4 => (n as f32).to_sql(ty, out),
        Type::FLOAT8 => (n as f64).to_sql(ty, out),
        Type::NUMERIC => Decimal::from(n).to_sql(ty, out),
        Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::UNKNOWN => n.to_string().to_sql(ty, out),
        _ => Err(format!("cannot bind integer value to a {} parameter", ty).into()),
    }
}
