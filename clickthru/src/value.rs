//! Cell values as they arrive from a visualization.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Number as JsonNumber, Value as JsonValue};

/// We use [`std::collections::BTreeMap`] as our default map structure.
pub type Map<K, V> = BTreeMap<K, V>;

/// A dynamically typed value taken from a clicked data point.
///
/// Values are loaded from loosely typed sources (query results serialized as
/// JSON), so this mirrors JSON's data model while keeping integers and floats
/// apart.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "JsonValue", into = "JsonValue")]
pub enum Value {
    #[default]
    Null,
    Boolean(bool),
    String(String),
    Float(f64),
    Signed(i64),
    Unsigned(u64),
    Array(Vec<Value>),
    Object(Map<String, Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Numeric view of this value, if it is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Signed(i) => Some(*i as f64),
            Self::Unsigned(u) => Some(*u as f64),
            _ => None,
        }
    }

    /// Integral view of this value. Floats only qualify if they have no
    /// fractional part.
    pub fn as_signed(&self) -> Option<i64> {
        match self {
            Self::Signed(i) => Some(*i),
            Self::Unsigned(u) => i64::try_from(*u).ok(),
            Self::Float(f) if f.is_finite() && f.fract() == 0.0 => Some(*f as i64),
            _ => None,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Self::Float(_) | Self::Signed(_) | Self::Unsigned(_))
    }
}

/// The raw string form of a value, used wherever a value is passed through
/// without any formatting applied. `Null` renders as an empty string, not
/// `null`.
impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::String(s) => write!(f, "{}", s),
            Self::Float(v) => {
                if v.is_nan() {
                    write!(f, "NaN")
                } else if v.is_infinite() {
                    write!(f, "{}Infinity", if *v < 0.0 { "-" } else { "" })
                } else {
                    write!(f, "{}", v)
                }
            }
            Self::Signed(i) => write!(f, "{}", i),
            Self::Unsigned(u) => write!(f, "{}", u),
            Self::Array(arr) => {
                for (i, el) in arr.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", el)?;
                }
                Ok(())
            }
            Self::Object(_) => write!(f, "{}", JsonValue::from(self.clone())),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Signed(i)
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        Self::Unsigned(u)
    }
}

impl<T> From<Vec<T>> for Value
where
    T: Into<Value>,
{
    fn from(v: Vec<T>) -> Self {
        Self::Array(v.into_iter().map(Into::into).collect())
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Self::Null)
    }
}

impl From<JsonValue> for Value {
    fn from(v: JsonValue) -> Self {
        match v {
            JsonValue::Null => Self::Null,
            JsonValue::Bool(b) => Self::Boolean(b),
            JsonValue::Number(n) => Self::from(n),
            JsonValue::String(s) => Self::String(s),
            JsonValue::Array(arr) => Self::Array(arr.into_iter().map(Into::into).collect()),
            JsonValue::Object(obj) => {
                Self::Object(Map::from_iter(obj.into_iter().map(|(k, v)| (k, v.into()))))
            }
        }
    }
}

impl From<JsonNumber> for Value {
    fn from(n: JsonNumber) -> Self {
        if let Some(u) = n.as_u64() {
            Self::Unsigned(u)
        } else if let Some(i) = n.as_i64() {
            Self::Signed(i)
        } else {
            // serde_json numbers are always representable as one of the three.
            Self::Float(n.as_f64().unwrap_or(f64::NAN))
        }
    }
}

impl From<Value> for JsonValue {
    fn from(v: Value) -> Self {
        match v {
            Value::Null => Self::Null,
            Value::Boolean(b) => Self::Bool(b),
            Value::String(s) => Self::String(s),
            Value::Float(f) => JsonNumber::from_f64(f)
                .map(Self::Number)
                .unwrap_or(Self::Null),
            Value::Signed(i) => Self::Number(JsonNumber::from(i)),
            Value::Unsigned(u) => Self::Number(JsonNumber::from(u)),
            Value::Array(v) => Self::Array(v.into_iter().map(Into::into).collect()),
            Value::Object(o) => {
                Self::Object(JsonMap::from_iter(o.into_iter().map(|(k, v)| (k, v.into()))))
            }
        }
    }
}
