mod common;

use std::collections::HashMap;

use biotsv::prelude::*;
use common::{
    read_text,
    temp_output,
};
use rstest::rstest;

fn sample_record() -> TsvRecord {
    [
        ("CHR", Value::from("chr1")),
        ("START", Value::from(100)),
        ("SCORE", Value::from(2.5)),
    ]
    .into_iter()
    .collect()
}

#[rstest]
#[case::tab("\t", ".txt")]
#[case::comma(",", ".csv")]
#[case::gzipped("\t", ".txt.gz")]
fn written_record_reads_back_equal(
    #[case] delimit: &str,
    #[case] suffix: &str,
) -> anyhow::Result<()> {
    let schema = vec![
        Column::new("CHR"),
        Column::typed("START", Converter::int()),
        Column::typed("SCORE", Converter::float()),
    ];
    let record = sample_record();
    let output = temp_output(suffix)?;

    let mut writer = TsvWriter::open(
        output.path(),
        &WriterOptions::default()
            .with_delimit(delimit)
            .with_cnames(schema.clone()),
    )?;
    writer.write(&record)?;
    writer.close()?;

    let mut reader = TsvReader::open(
        output.path(),
        &ReaderOptions::default()
            .with_delimit(delimit)
            .with_cnames(schema),
    )?;
    let read_back = reader
        .next_record()?
        .expect("one record");
    assert_eq!(read_back, record);
    Ok(())
}

#[test]
fn fields_follow_schema_order() -> anyhow::Result<()> {
    let output = temp_output(".txt")?;
    let mut writer = TsvWriter::open(
        output.path(),
        &WriterOptions::default().with_cnames(["SCORE", "CHR"]),
    )?;
    writer.write(&sample_record())?;
    writer.close()?;

    assert_eq!(read_text(output.path())?, "2.5\tchr1\n");
    Ok(())
}

#[test]
fn plain_maps_are_writable() -> anyhow::Result<()> {
    let output = temp_output(".txt")?;
    let mut writer = TsvWriter::open(
        output.path(),
        &WriterOptions::default().with_cnames(["GENE", "COUNT"]),
    )?;
    let mut row = HashMap::new();
    row.insert("GENE".to_string(), "TP53".to_string());
    row.insert("COUNT".to_string(), "4".to_string());
    writer.write(&row)?;
    writer.close()?;

    assert_eq!(read_text(output.path())?, "TP53\t4\n");
    Ok(())
}

#[test]
fn missing_field_is_reported() -> anyhow::Result<()> {
    let output = temp_output(".txt")?;
    let mut writer = TsvWriter::open(
        output.path(),
        &WriterOptions::default().with_cnames(["CHR", "END"]),
    )?;
    let err = writer
        .write(&sample_record())
        .unwrap_err();
    assert_eq!(
        err.downcast_ref::<TsvError>(),
        Some(&TsvError::MissingField("END".to_string()))
    );
    Ok(())
}

#[test]
fn bed_writer_has_fixed_schema() -> anyhow::Result<()> {
    let output = temp_output(".bed")?;
    let mut writer = TsvWriter::open(output.path(), &WriterOptions::default().with_ftype("bed"))?;
    let record: TsvRecord = [
        ("CHR", Value::from("chr1")),
        ("START", Value::from(1)),
        ("END", Value::from(9)),
        ("NAME", Value::from("BED1")),
        ("SCORE", Value::from(0.0)),
        ("STRAND", Value::from("+")),
    ]
    .into_iter()
    .collect();
    writer.write(&record)?;
    writer.close()?;

    assert_eq!(read_text(output.path())?, "chr1\t1\t9\tBED1\t0.0\t+\n");
    Ok(())
}

#[rstest]
#[case::defaults(HeadOptions::default(), "CHR\tSTART\n")]
#[case::prefixed(HeadOptions::default().with_prefix("#"), "#CHR\tSTART\n")]
#[case::own_delimiter(HeadOptions::default().with_delimit(","), "CHR,START\n")]
#[case::renamed(
    HeadOptions::default().with_transform(HeadTransform::rename([("CHR", "chrom")])),
    "chrom\tSTART\n"
)]
#[case::per_key(
    HeadOptions::default().with_transform(HeadTransform::per_key([("START", |k: &str| k.to_lowercase())])),
    "CHR\tstart\n"
)]
#[case::bulk(
    HeadOptions::default()
        .with_prefix("#")
        .with_transform(HeadTransform::bulk(|keys| keys.into_iter().rev().collect())),
    "#START\tCHR\n"
)]
fn header_line(
    #[case] head: HeadOptions,
    #[case] expected: &str,
) -> anyhow::Result<()> {
    let output = temp_output(".txt")?;
    let mut writer = TsvWriter::open(
        output.path(),
        &WriterOptions::default().with_cnames(["CHR", "START"]),
    )?;
    writer.write_head(&head)?;
    writer.close()?;

    assert_eq!(read_text(output.path())?, expected);
    Ok(())
}

#[test]
fn nometa_writer_is_positional() -> anyhow::Result<()> {
    let output = temp_output(".txt")?;
    let mut writer = TsvWriter::open(
        output.path(),
        &WriterOptions::default().with_ftype("nometa"),
    )?;
    writer.write_head_with(["x", "y"], &HeadOptions::default())?;
    writer.write_row(&Row::Raw(vec!["1".into(), "2".into()]))?;
    writer.write_row(&Row::Record(sample_record()))?;
    writer.close()?;

    assert_eq!(read_text(output.path())?, "x\ty\n1\t2\nchr1\t100\t2.5\n");
    Ok(())
}

#[rstest]
#[case::unknown("xyz")]
#[case::reader_only("bed12")]
#[case::header_reader("head")]
fn unsupported_writer_is_rejected_before_io(#[case] tag: &str) {
    let path = std::env::temp_dir()
        .join("biotsv-never-created")
        .join("out.txt");
    let err = TsvWriter::open(&path, &WriterOptions::default().with_ftype(tag))
        .err()
        .expect("unsupported format must fail");
    assert!(matches!(
        err.downcast_ref::<TsvError>(),
        Some(TsvError::NoSuchWriter(_))
    ));
    assert!(!path.exists());
}

#[test]
fn compression_level_is_validated() {
    let options = WriterOptions::default().with_compression(Compression::Gz, 12);
    let err = TsvWriter::from_writer(Vec::new(), &options)
        .err()
        .expect("level 12 must fail");
    assert!(matches!(
        err.downcast_ref::<TsvError>(),
        Some(TsvError::InvalidOption(_))
    ));
}

#[test]
fn close_is_idempotent() -> anyhow::Result<()> {
    let output = temp_output(".txt.gz")?;
    let mut writer = TsvWriter::open(output.path(), &WriterOptions::default().with_cnames(["A"]))?;
    writer.write_fields(["1"])?;
    writer.close()?;
    writer.close()?;
    assert!(writer.is_closed());
    assert!(writer.write_fields(["2"]).is_err());
    assert_eq!(read_text(output.path())?, "1\n");
    Ok(())
}

#[test]
fn dropped_writer_flushes() -> anyhow::Result<()> {
    let output = temp_output(".txt")?;
    {
        let mut writer = TsvWriter::open(output.path(), &WriterOptions::default())?;
        writer.write_fields([1, 2, 3])?;
    }
    assert_eq!(read_text(output.path())?, "1\t2\t3\n");
    Ok(())
}
