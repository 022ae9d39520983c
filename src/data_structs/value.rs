use std::cmp::Ordering;
use std::fmt::{
    Debug,
    Display,
};
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Context;
use serde::{
    Deserialize,
    Serialize,
};

use crate::error::TsvError;

/// Typed value of a single parsed field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric view of the value; integers are widened.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            Value::Str(_) => None,
        }
    }

    /// Only an empty string counts as empty. Zero is a value.
    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Str(s) if s.is_empty())
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Str(String::new())
    }
}

impl Display for Value {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", format_float(*v)),
            Value::Str(s) => write!(f, "{}", s),
        }
    }
}

/// Floats keep a trailing `.0` when integral so `0.0` does not become `0`.
fn format_float(v: f64) -> String {
    if v.is_nan() {
        "nan".to_string()
    }
    else if v.is_infinite() {
        let sign = if v > 0.0 { "" } else { "-" };
        format!("{}inf", sign)
    }
    else if v.fract() == 0.0 && v.abs() < 1e16 {
        format!("{:.1}", v)
    }
    else {
        format!("{}", v)
    }
}

impl PartialEq for Value {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(
        &self,
        other: &Self,
    ) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Numbers compare numerically with each other and sort before strings.
impl Ord for Value {
    fn cmp(
        &self,
        other: &Self,
    ) -> Ordering {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Str(a), Value::Str(b)) => a.cmp(b),
            (Value::Str(_), _) => Ordering::Greater,
            (_, Value::Str(_)) => Ordering::Less,
            (a, b) => {
                let a = a.as_float().unwrap_or_default();
                let b = b.as_float().unwrap_or_default();
                a.total_cmp(&b)
            },
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

type ConvertFn = dyn Fn(&str) -> anyhow::Result<Value> + Send + Sync;

/// Named, pure conversion from raw field text to a [`Value`].
///
/// A column without a converter keeps its text as [`Value::Str`].
#[derive(Clone)]
pub struct Converter {
    name: Arc<str>,
    func: Arc<ConvertFn>,
}

impl Converter {
    pub fn new<F>(
        name: &str,
        func: F,
    ) -> Self
    where
        F: Fn(&str) -> anyhow::Result<Value> + Send + Sync + 'static, {
        Self {
            name: Arc::from(name),
            func: Arc::new(func),
        }
    }

    pub fn int() -> Self {
        Self::new("int", |text| {
            text.trim()
                .parse::<i64>()
                .map(Value::Int)
                .with_context(|| format!("invalid literal for int(): '{}'", text))
        })
    }

    pub fn float() -> Self {
        Self::new("float", |text| {
            text.trim()
                .parse::<f64>()
                .map(Value::Float)
                .with_context(|| format!("could not convert string to float: '{}'", text))
        })
    }

    pub fn string() -> Self {
        Self::new("str", |text| Ok(Value::Str(text.to_string())))
    }

    /// Resolves one of the built-in converters by name.
    pub fn from_name(name: &str) -> Result<Self, TsvError> {
        match name.trim().to_lowercase().as_str() {
            "int" | "integer" => Ok(Self::int()),
            "float" | "double" => Ok(Self::float()),
            "str" | "string" => Ok(Self::string()),
            _ => Err(TsvError::UnknownConverter(name.to_string())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn convert(
        &self,
        text: &str,
    ) -> anyhow::Result<Value> {
        (self.func)(text)
    }
}

impl Debug for Converter {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "Converter({})", self.name)
    }
}

impl FromStr for Converter {
    type Err = TsvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

impl Serialize for Converter {
    fn serialize<S>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer, {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Converter {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>, {
        let s = String::deserialize(deserializer)?;
        Converter::from_name(&s).map_err(serde::de::Error::custom)
    }
}
