use std::collections::{
    BTreeMap,
    HashMap,
};
use std::fmt::Display;
use std::hash::BuildHasher;
use std::ops::Index;

use indexmap::IndexMap;
use itertools::Itertools;
use serde::{
    Deserialize,
    Serialize,
};

use super::value::Value;

/// One parsed row as an ordered mapping from column name to value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TsvRecord {
    fields: IndexMap<String, Value>,
}

impl TsvRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: IndexMap::with_capacity(capacity),
        }
    }

    pub fn get(
        &self,
        name: &str,
    ) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn get_mut(
        &mut self,
        name: &str,
    ) -> Option<&mut Value> {
        self.fields.get_mut(name)
    }

    /// Text of a string field. `None` for absent or non-string fields.
    pub fn get_str(
        &self,
        name: &str,
    ) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn get_int(
        &self,
        name: &str,
    ) -> Option<i64> {
        self.get(name).and_then(Value::as_int)
    }

    pub fn get_float(
        &self,
        name: &str,
    ) -> Option<f64> {
        self.get(name).and_then(Value::as_float)
    }

    /// Sets a field; new names go to the end, existing ones keep their slot.
    pub fn set(
        &mut self,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Option<Value> {
        self.fields
            .insert(name.into(), value.into())
    }

    pub fn remove(
        &mut self,
        name: &str,
    ) -> Option<Value> {
        self.fields.shift_remove(name)
    }

    pub fn contains(
        &self,
        name: &str,
    ) -> bool {
        self.fields.contains_key(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.fields.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields
            .iter()
            .map(|(k, v)| (k.as_str(), v))
    }

    pub fn first(&self) -> Option<&Value> {
        self.fields.first().map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn into_inner(self) -> IndexMap<String, Value> {
        self.fields
    }
}

impl Index<&str> for TsvRecord {
    type Output = Value;

    fn index(
        &self,
        index: &str,
    ) -> &Self::Output {
        &self.fields[index]
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for TsvRecord {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Display for TsvRecord {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        let inner = self
            .fields
            .iter()
            .map(|(k, v)| {
                match v {
                    Value::Str(s) => format!("{}={:?}", k, s),
                    other => format!("{}={}", k, other),
                }
            })
            .join(", ");
        write!(f, "TsvRecord({})", inner)
    }
}

/// Anything a writer can look a named field up in.
pub trait RecordLike {
    /// Text form of field `key`, or `None` if the field is absent.
    fn lookup(
        &self,
        key: &str,
    ) -> Option<String>;
}

impl RecordLike for TsvRecord {
    fn lookup(
        &self,
        key: &str,
    ) -> Option<String> {
        self.get(key).map(Value::to_string)
    }
}

impl<V: Display, S: BuildHasher> RecordLike for HashMap<String, V, S> {
    fn lookup(
        &self,
        key: &str,
    ) -> Option<String> {
        self.get(key).map(V::to_string)
    }
}

impl<V: Display, S: BuildHasher> RecordLike for IndexMap<String, V, S> {
    fn lookup(
        &self,
        key: &str,
    ) -> Option<String> {
        self.get(key).map(V::to_string)
    }
}

impl<V: Display> RecordLike for BTreeMap<String, V> {
    fn lookup(
        &self,
        key: &str,
    ) -> Option<String> {
        self.get(key).map(V::to_string)
    }
}

impl<T: RecordLike + ?Sized> RecordLike for &T {
    fn lookup(
        &self,
        key: &str,
    ) -> Option<String> {
        (**self).lookup(key)
    }
}

/// A row as produced by a reader: a schema-keyed record, or the raw split
/// fields for schema-less (`nometa`) readers.
#[derive(Debug, Clone, PartialEq)]
pub enum Row {
    Record(TsvRecord),
    Raw(Vec<String>),
}

impl Row {
    pub fn is_empty(&self) -> bool {
        match self {
            Row::Record(r) => r.is_empty(),
            Row::Raw(v) => v.is_empty(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Row::Record(r) => r.len(),
            Row::Raw(v) => v.len(),
        }
    }

    /// First field in column order, used as the default join key.
    pub fn first(&self) -> Option<Value> {
        match self {
            Row::Record(r) => r.first().cloned(),
            Row::Raw(v) => v.first().map(|s| Value::Str(s.clone())),
        }
    }

    /// Text of every field in column order.
    pub fn fields(&self) -> Vec<String> {
        match self {
            Row::Record(r) => r.values().map(Value::to_string).collect_vec(),
            Row::Raw(v) => v.clone(),
        }
    }

    pub fn as_record(&self) -> Option<&TsvRecord> {
        match self {
            Row::Record(r) => Some(r),
            Row::Raw(_) => None,
        }
    }

    pub fn into_record(self) -> Option<TsvRecord> {
        match self {
            Row::Record(r) => Some(r),
            Row::Raw(_) => None,
        }
    }

    pub fn as_raw(&self) -> Option<&[String]> {
        match self {
            Row::Record(_) => None,
            Row::Raw(v) => Some(v.as_slice()),
        }
    }
}

impl From<TsvRecord> for Row {
    fn from(value: TsvRecord) -> Self {
        Row::Record(value)
    }
}

impl From<Vec<String>> for Row {
    fn from(value: Vec<String>) -> Self {
        Row::Raw(value)
    }
}

impl Display for Row {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Row::Record(r) => write!(f, "{}", r),
            Row::Raw(v) => write!(f, "{:?}", v),
        }
    }
}
