use std::fmt::Display;
use std::str::FromStr;

use indexmap::IndexMap;
use itertools::Itertools;
use serde::{
    Deserialize,
    Serialize,
};

use super::value::{
    Converter,
    Value,
};
use crate::error::TsvError;

/// A single schema entry: column name plus optional converter.
///
/// Deserializes from either `"NAME:conv"` or `{"name": .., "converter": ..}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ColumnRepr")]
pub struct Column {
    pub name:      String,
    #[serde(default)]
    pub converter: Option<Converter>,
}

impl Column {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name:      name.into(),
            converter: None,
        }
    }

    pub fn typed(
        name: impl Into<String>,
        converter: Converter,
    ) -> Self {
        Self {
            name:      name.into(),
            converter: Some(converter),
        }
    }
}

impl From<&str> for Column {
    fn from(value: &str) -> Self {
        Column::new(value)
    }
}

impl From<String> for Column {
    fn from(value: String) -> Self {
        Column::new(value)
    }
}

impl From<&String> for Column {
    fn from(value: &String) -> Self {
        Column::new(value.clone())
    }
}

impl<S: Into<String>> From<(S, Converter)> for Column {
    fn from(value: (S, Converter)) -> Self {
        Column::typed(value.0, value.1)
    }
}

impl<S: Into<String>> From<(S, Option<Converter>)> for Column {
    fn from(value: (S, Option<Converter>)) -> Self {
        Column {
            name:      value.0.into(),
            converter: value.1,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColumnRepr {
    Spec(String),
    Full {
        name:      String,
        #[serde(default)]
        converter: Option<Converter>,
    },
}

impl TryFrom<ColumnRepr> for Column {
    type Error = TsvError;

    fn try_from(value: ColumnRepr) -> Result<Self, Self::Error> {
        match value {
            ColumnRepr::Spec(spec) => spec.parse(),
            ColumnRepr::Full { name, converter } => Ok(Column { name, converter }),
        }
    }
}

/// Parses `NAME` or `NAME:conv`, e.g. `START:int`.
impl FromStr for Column {
    type Err = TsvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.rsplit_once(':') {
            Some((name, conv)) if !name.is_empty() => {
                Ok(Column::typed(name, Converter::from_name(conv)?))
            },
            _ => Ok(Column::new(s)),
        }
    }
}

/// Ordered column name to converter mapping.
///
/// Insertion order is column order, both when parsing a line and when
/// writing a record. Re-adding an existing name replaces its converter but
/// keeps its position.
#[derive(Debug, Clone, Default)]
pub struct TsvMeta {
    columns: IndexMap<String, Option<Converter>>,
}

impl TsvMeta {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends columns at the end.
    pub fn add<I, C>(
        &mut self,
        columns: I,
    ) -> &mut Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Column>, {
        for column in columns {
            let column = column.into();
            self.columns
                .insert(column.name, column.converter);
        }
        self
    }

    pub fn append<I, C>(
        &mut self,
        columns: I,
    ) -> &mut Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Column>, {
        self.add(columns)
    }

    pub fn add_column(
        &mut self,
        column: impl Into<Column>,
    ) -> &mut Self {
        self.add(std::iter::once(column))
    }

    /// Inserts columns at the start, in the given order, ahead of every
    /// existing column.
    pub fn prepend<I, C>(
        &mut self,
        columns: I,
    ) -> &mut Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Column>, {
        let existing = std::mem::take(&mut self.columns);
        let prepended = columns
            .into_iter()
            .map(Into::into)
            .map(|c: Column| (c.name, c.converter));
        for (name, converter) in prepended.chain(existing) {
            self.columns.insert(name, converter);
        }
        self
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn names(&self) -> Vec<String> {
        self.columns.keys().cloned().collect_vec()
    }

    pub fn columns(&self) -> impl Iterator<Item = Column> + '_ {
        self.columns
            .iter()
            .map(|(name, converter)| {
                Column {
                    name:      name.clone(),
                    converter: converter.clone(),
                }
            })
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn contains(
        &self,
        name: &str,
    ) -> bool {
        self.columns.contains_key(name)
    }

    /// `None` if the column is absent, `Some(None)` if it has no converter.
    pub fn converter(
        &self,
        name: &str,
    ) -> Option<Option<&Converter>> {
        self.columns
            .get(name)
            .map(Option::as_ref)
    }

    pub fn clear(&mut self) {
        self.columns.clear();
    }

    /// Applies the converter of column `index` to `text`.
    pub(crate) fn convert_at(
        &self,
        index: usize,
        text: &str,
    ) -> anyhow::Result<Value> {
        match self.columns.get_index(index) {
            Some((name, Some(converter))) => {
                converter.convert(text).map_err(|e| {
                    e.context(format!("Failed to convert column '{}'", name))
                })
            },
            _ => Ok(Value::Str(text.to_string())),
        }
    }
}

impl<C: Into<Column>> FromIterator<C> for TsvMeta {
    fn from_iter<T: IntoIterator<Item = C>>(iter: T) -> Self {
        let mut meta = TsvMeta::new();
        meta.add(iter);
        meta
    }
}

impl Display for TsvMeta {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        let inner = self
            .columns
            .iter()
            .map(|(name, conv)| {
                match conv {
                    Some(conv) => format!("{}={}", name, conv.name()),
                    None => name.clone(),
                }
            })
            .join(", ");
        write!(f, "TsvMeta({})", inner)
    }
}
