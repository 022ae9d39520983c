use std::path::Path;

use log::{
    debug,
    info,
};

use super::options::{
    HeadOptions,
    ReaderOptions,
    WriterOptions,
};
use super::read::TsvReader;
use super::write::TsvWriter;
use crate::data_structs::Row;

/// Output format tag meaning "same columns as the input".
pub const READER_FTYPE: &str = "reader";

/// Copies `input` to `output`, re-delimiting and re-typing rows on the way.
/// See [`tsv_ops`].
pub fn tsv_copy<P, Q>(
    input: P,
    output: Q,
    inopts: &ReaderOptions,
    outopts: &WriterOptions,
    head: &HeadOptions,
) -> anyhow::Result<usize>
where
    P: AsRef<Path>,
    Q: AsRef<Path>, {
    tsv_ops(input, output, inopts, outopts, head, |row| Ok(Some(row)))
}

/// Reads `input`, passes every row through `ops` and writes the result to
/// `output`.
///
/// `ops` may rewrite a row or drop it by returning `None`; empty rows are
/// dropped as well. When `outopts` names neither a format nor columns (or
/// names the `reader` format), the output takes the input's columns.
/// Returns the number of rows written.
pub fn tsv_ops<P, Q, F>(
    input: P,
    output: Q,
    inopts: &ReaderOptions,
    outopts: &WriterOptions,
    head: &HeadOptions,
    mut ops: F,
) -> anyhow::Result<usize>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    F: FnMut(Row) -> anyhow::Result<Option<Row>>, {
    let mut reader = TsvReader::open(input, inopts)?;
    if reader.meta().is_empty() {
        reader.auto_meta("COL")?;
    }

    let copy_reader_meta = match outopts.ftype.as_deref() {
        Some(ftype) if ftype.eq_ignore_ascii_case(READER_FTYPE) => true,
        None | Some("") => outopts.cnames.is_empty(),
        Some(_) => false,
    };

    let mut writer = if copy_reader_meta {
        let outopts = WriterOptions {
            ftype: None,
            ..outopts.clone()
        };
        let mut writer = TsvWriter::open(output, &outopts)?;
        writer
            .meta_mut()
            .prepend(reader.meta().columns());
        debug!("Output takes the input columns: {}", writer.meta());
        writer
    }
    else {
        TsvWriter::open(output, outopts)?
    };

    if head.head {
        writer.write_head(head)?;
    }

    let mut written = 0;
    for row in reader.by_ref() {
        let row = match ops(row?)? {
            Some(row) if !row.is_empty() => row,
            _ => continue,
        };
        writer.write_row(&row)?;
        written += 1;
    }
    writer.close()?;
    reader.close();

    info!("Wrote {} rows", written);
    Ok(written)
}
