use std::collections::HashMap;

use super::*;
use crate::error::TsvError;

// --- TsvMeta Tests ---

#[test]
fn test_meta_add_keeps_insertion_order() {
    let mut meta = TsvMeta::new();
    meta.add(["CHR", "START"]);
    meta.add_column(("END", Converter::int()));
    assert_eq!(meta.names(), vec!["CHR", "START", "END"]);
    assert!(meta.converter("START").unwrap().is_none());
    assert_eq!(meta.converter("END").unwrap().unwrap().name(), "int");
    assert!(meta.converter("NAME").is_none());
}

#[test]
fn test_meta_readd_replaces_converter_in_place() {
    let mut meta: TsvMeta = ["A", "B", "C"].into_iter().collect();
    meta.add_column(("B", Converter::float()));
    assert_eq!(meta.names(), vec!["A", "B", "C"]);
    assert_eq!(meta.converter("B").unwrap().unwrap().name(), "float");
}

#[test]
fn test_meta_prepend_rebuilds_order() {
    let mut meta: TsvMeta = ["C", "D"].into_iter().collect();
    meta.prepend(vec![
        Column::new("A"),
        Column::typed("B", Converter::int()),
    ]);
    assert_eq!(meta.names(), vec!["A", "B", "C", "D"]);
    assert_eq!(meta.converter("B").unwrap().unwrap().name(), "int");
}

#[test]
fn test_meta_prepend_existing_name_moves_to_front() {
    let mut meta = TsvMeta::new();
    meta.add(["A", "B"]);
    meta.add_column(("C", Converter::int()));
    meta.prepend(["C"]);
    assert_eq!(meta.names(), vec!["C", "A", "B"]);
    // The later (existing) entry wins the converter.
    assert_eq!(meta.converter("C").unwrap().unwrap().name(), "int");
}

#[test]
fn test_meta_display() {
    let mut meta = TsvMeta::new();
    meta.add_column("CHR");
    meta.add_column(("START", Converter::int()));
    assert_eq!(meta.to_string(), "TsvMeta(CHR, START=int)");
}

#[test]
fn test_column_from_str() {
    let col: Column = "START:int".parse().unwrap();
    assert_eq!(col.name, "START");
    assert_eq!(col.converter.unwrap().name(), "int");

    let col: Column = "NAME".parse().unwrap();
    assert_eq!(col.name, "NAME");
    assert!(col.converter.is_none());

    let err = "X:decimal".parse::<Column>().unwrap_err();
    assert_eq!(err, TsvError::UnknownConverter("decimal".into()));
}

#[test]
fn test_meta_convert_at_propagates_converter_error() {
    let meta: TsvMeta = [Column::typed("START", Converter::int())]
        .into_iter()
        .collect();
    assert_eq!(meta.convert_at(0, "12").unwrap(), Value::Int(12));
    let err = meta.convert_at(0, "abc").unwrap_err();
    assert!(format!("{:#}", err).contains("START"));
    // Columns beyond the schema are kept as text.
    assert_eq!(meta.convert_at(5, "x").unwrap(), Value::from("x"));
}

// --- Value / Converter Tests ---

#[test]
fn test_value_display() {
    assert_eq!(Value::Int(3).to_string(), "3");
    assert_eq!(Value::Float(0.0).to_string(), "0.0");
    assert_eq!(Value::Float(2.5).to_string(), "2.5");
    assert_eq!(Value::from("+").to_string(), "+");
}

#[test]
fn test_value_ordering() {
    assert!(Value::Int(2) < Value::Int(10));
    assert!(Value::from("10") < Value::from("2"));
    assert_eq!(Value::Int(1), Value::Float(1.0));
    assert!(Value::Float(1e9) < Value::from("a"));
}

#[test]
fn test_converters() {
    assert_eq!(Converter::int().convert(" 42 ").unwrap(), Value::Int(42));
    assert_eq!(Converter::float().convert("1.5").unwrap(), Value::Float(1.5));
    assert!(Converter::int().convert("").is_err());
    assert!(Converter::float().convert("x").is_err());
    assert!(Converter::from_name("bool").is_err());
    let upper = Converter::new("upper", |s| Ok(Value::Str(s.to_uppercase())));
    assert_eq!(upper.convert("chr1").unwrap(), Value::from("CHR1"));
}

// --- TsvRecord / Row Tests ---

#[test]
fn test_record_access_and_display() {
    let mut record: TsvRecord = [
        ("CHR", Value::from("chr1")),
        ("START", Value::Int(100)),
    ]
    .into_iter()
    .collect();
    assert_eq!(record.get_str("CHR"), Some("chr1"));
    assert_eq!(record.get_int("START"), Some(100));
    assert_eq!(record["START"], Value::Int(100));
    record.set("SCORE", 0.0);
    assert_eq!(
        record.to_string(),
        "TsvRecord(CHR=\"chr1\", START=100, SCORE=0.0)"
    );
    assert_eq!(record.first(), Some(&Value::from("chr1")));
}

#[test]
fn test_record_like_for_maps() {
    let mut map = HashMap::new();
    map.insert("A".to_string(), 1);
    assert_eq!(map.lookup("A"), Some("1".to_string()));
    assert_eq!(map.lookup("B"), None);
}

#[test]
fn test_row_first_and_fields() {
    let raw = Row::Raw(vec!["k".into(), "v".into()]);
    assert_eq!(raw.first(), Some(Value::from("k")));
    assert_eq!(raw.fields(), vec!["k", "v"]);
    assert!(raw.as_record().is_none());

    let rec: TsvRecord = [("A", Value::Int(1))].into_iter().collect();
    let row = Row::from(rec);
    assert_eq!(row.fields(), vec!["1"]);
    assert!(!row.is_empty());
    assert!(Row::Raw(vec![]).is_empty());
}
