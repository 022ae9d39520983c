//! Core data types shared by the readers, writers and the synchronized scan.
//!
//! - [`Value`] is the typed content of one field and [`Converter`] the named
//!   function that produces it from raw text.
//! - [`TsvMeta`] is the ordered schema (column name to optional converter)
//!   that governs both parsing and writing, built from [`Column`]s.
//! - [`TsvRecord`] is one parsed row, keyed by column name in schema order.
//!   [`Row`] wraps it together with the raw field list produced by
//!   schema-less readers.
//! - [`RecordLike`] is implemented by everything a writer can look fields up
//!   in: records and the usual string-keyed maps.

mod meta;
mod record;
mod value;

#[cfg(test)]
mod tests;

pub use meta::{
    Column,
    TsvMeta,
};
pub use record::{
    RecordLike,
    Row,
    TsvRecord,
};
pub use value::{
    Converter,
    Value,
};
