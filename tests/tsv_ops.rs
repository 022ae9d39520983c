mod common;

use biotsv::prelude::*;
use common::{
    read_text,
    temp_input,
    temp_output,
};
use rstest::rstest;

#[test]
fn copy_takes_reader_columns() -> anyhow::Result<()> {
    let input = temp_input("A\tB\n1\t2\n3\t4\n", ".txt")?;
    let output = temp_output(".csv")?;

    let written = tsv_copy(
        input.path(),
        output.path(),
        &ReaderOptions::default().with_ftype("head"),
        &WriterOptions::default().with_delimit(","),
        &HeadOptions::default(),
    )?;
    assert_eq!(written, 2);
    assert_eq!(read_text(output.path())?, "A,B\n1,2\n3,4\n");
    Ok(())
}

#[rstest]
#[case::lower("reader")]
#[case::upper("READER")]
fn reader_format_keeps_cnames_after_input_columns(#[case] tag: &str) -> anyhow::Result<()> {
    let input = temp_input("A\n1\n", ".txt")?;
    let output = temp_output(".txt")?;

    tsv_ops(
        input.path(),
        output.path(),
        &ReaderOptions::default().with_ftype("head"),
        &WriterOptions::default()
            .with_ftype(tag)
            .with_cnames(["DOUBLE"]),
        &HeadOptions::default().with_prefix("#"),
        |row| {
            let mut record = match row.into_record() {
                Some(record) => record,
                None => return Ok(None),
            };
            let doubled = record
                .get_str("A")
                .unwrap_or_default()
                .repeat(2);
            record.set("DOUBLE", doubled);
            Ok(Some(Row::Record(record)))
        },
    )?;
    assert_eq!(read_text(output.path())?, "#A\tDOUBLE\n1\t11\n");
    Ok(())
}

#[test]
fn ops_can_drop_rows() -> anyhow::Result<()> {
    let input = temp_input("chr1\t1\t2\nchr2\t3\t4\nchr1\t5\t6\n", ".bed.gz")?;
    let output = temp_output(".bed")?;

    let written = tsv_ops(
        input.path(),
        output.path(),
        &ReaderOptions::default().with_ftype("bed"),
        &WriterOptions::default().with_ftype("bed"),
        &HeadOptions::default().with_head(false),
        |row| {
            let keep = row
                .as_record()
                .and_then(|r| r.get_str("CHR"))
                == Some("chr1");
            Ok(keep.then_some(row))
        },
    )?;
    assert_eq!(written, 2);
    assert_eq!(
        read_text(output.path())?,
        "chr1\t1\t2\tBED1\t0.0\t+\nchr1\t5\t6\tBED3\t0.0\t+\n"
    );
    Ok(())
}

#[test]
fn explicit_columns_select_fields() -> anyhow::Result<()> {
    let input = temp_input("A\tB\tC\n1\t2\t3\n", ".txt")?;
    let output = temp_output(".txt")?;

    tsv_copy(
        input.path(),
        output.path(),
        &ReaderOptions::default().with_ftype("head"),
        &WriterOptions::default().with_cnames(["C", "A"]),
        &HeadOptions::default().with_head(false),
    )?;
    assert_eq!(read_text(output.path())?, "3\t1\n");
    Ok(())
}

#[test]
fn schema_less_input_gets_placeholders() -> anyhow::Result<()> {
    let input = temp_input("x\ty\n", ".txt")?;
    let output = temp_output(".txt")?;

    tsv_copy(
        input.path(),
        output.path(),
        &ReaderOptions::default(),
        &WriterOptions::default(),
        &HeadOptions::default(),
    )?;
    assert_eq!(read_text(output.path())?, "COL1\tCOL2\nx\ty\n");
    Ok(())
}

#[test]
fn unknown_output_format_fails() -> anyhow::Result<()> {
    let input = temp_input("x\n", ".txt")?;
    let output = temp_output(".txt")?;
    let err = tsv_copy(
        input.path(),
        output.path(),
        &ReaderOptions::default(),
        &WriterOptions::default().with_ftype("bedpe"),
        &HeadOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<TsvError>(),
        Some(TsvError::NoSuchWriter(_))
    ));
    Ok(())
}
