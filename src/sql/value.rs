//! Bindable scalar values.

use serde::Serialize;

/// A scalar value that is either bound as a parameter or rendered as a
/// literal by [`SqlDialect::quote_value`](super::dialect::SqlDialect::quote_value).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Unquoted text form, as used on the right-hand side of `IS` and as the
    /// base of LIKE patterns.
    ///
    /// Returns `None` for NaN and infinities, which have no SQL spelling.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Value::Null => Some("NULL".into()),
            Value::Bool(true) => Some("TRUE".into()),
            Value::Bool(false) => Some("FALSE".into()),
            Value::Int(n) => Some(n.to_string()),
            Value::Float(f) => format_float(*f),
            Value::Text(s) => Some(s.clone()),
        }
    }
}

/// Format a float with ryu; `None` when it is not finite.
pub fn format_float(f: f64) -> Option<String> {
    if !f.is_finite() {
        return None;
    }
    let mut buffer = ryu::Buffer::new();
    Some(buffer.format_finite(f).to_string())
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! int_value {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Value::Int(i64::from(n))
                }
            }
        )*
    };
}

int_value!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::Float(f64::from(f))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::Text(s.clone())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}
