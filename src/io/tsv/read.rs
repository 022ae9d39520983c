use std::fs::File;
use std::io::{
    self,
    BufRead,
    BufReader,
    Cursor,
    Read,
    Seek,
    SeekFrom,
};
use std::path::{
    Path,
    PathBuf,
};
use std::sync::Arc;

use anyhow::{
    bail,
    Context,
};
use itertools::Itertools;
use log::{
    debug,
    warn,
};

use super::format::FileType;
use super::options::ReaderOptions;
use crate::data_structs::{
    Column,
    Row,
    TsvMeta,
    TsvRecord,
    Value,
};
use crate::io::compression::Compression;

/// Where the reader's bytes come from. Kept so that streams which cannot
/// seek can be reopened on rewind.
#[derive(Debug, Clone)]
enum Source {
    File {
        path:        PathBuf,
        compression: Compression,
    },
    Memory {
        bytes:       Arc<[u8]>,
        compression: Compression,
    },
}

impl Source {
    fn open(&self) -> io::Result<Handle> {
        match self {
            Source::File {
                path,
                compression: Compression::None,
            } => Ok(Handle::Seekable(BufReader::new(File::open(path)?))),
            Source::File { path, compression } => {
                Ok(Handle::Stream(compression.get_decoder(File::open(path)?)))
            },
            Source::Memory { bytes, compression } => {
                Ok(Handle::Stream(
                    compression.get_decoder(Cursor::new(Arc::clone(bytes))),
                ))
            },
        }
    }

    fn describe(&self) -> String {
        match self {
            Source::File { path, .. } => path.display().to_string(),
            Source::Memory { bytes, .. } => format!("<memory: {} bytes>", bytes.len()),
        }
    }
}

enum Handle {
    Seekable(BufReader<File>),
    Stream(Box<dyn BufRead>),
}

impl Handle {
    fn read_line(
        &mut self,
        buf: &mut String,
    ) -> io::Result<usize> {
        match self {
            Handle::Seekable(inner) => inner.read_line(buf),
            Handle::Stream(inner) => inner.read_line(buf),
        }
    }
}

/// BED columns that get a default when empty.
const BED_OPTIONAL: [&str; 3] = ["NAME", "SCORE", "STRAND"];

/// Sequential, schema-driven reader of one delimited text source.
///
/// The reader owns its file handle. It is released by [`TsvReader::close`]
/// or when the reader is dropped, whichever comes first.
///
/// Iteration stops at end of file *and* at the first blank line.
pub struct TsvReader {
    source:    Source,
    handle:    Option<Handle>,
    ftype:     FileType,
    delimit:   String,
    comment:   Option<String>,
    meta:      TsvMeta,
    /// Offset right after the skipped region (and header, if any)
    tell:      u64,
    /// Bytes consumed from the (decompressed) stream so far
    pos:       u64,
    /// Counter for synthesized BED names
    bed_index: usize,
    line_no:   usize,
    tell_line: usize,
    exhausted: bool,
}

impl TsvReader {
    /// Opens `path` with the reader selected by `options.ftype`.
    ///
    /// Unknown format tags fail with
    /// [`TsvError::NoSuchReader`](crate::error::TsvError::NoSuchReader)
    /// before the file is touched.
    pub fn open<P: AsRef<Path>>(
        path: P,
        options: &ReaderOptions,
    ) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let ftype = options.validate()?;
        let compression = options
            .compression
            .unwrap_or_else(|| Compression::from_path(path));
        let source = Source::File {
            path: path.to_path_buf(),
            compression,
        };
        Self::from_source(source, ftype, options)
            .with_context(|| format!("Failed to open reader for {}", path.display()))
    }

    /// Builds a reader over in-memory data, e.g. standard input.
    pub fn from_bytes(
        bytes: impl Into<Vec<u8>>,
        options: &ReaderOptions,
    ) -> anyhow::Result<Self> {
        let ftype = options.validate()?;
        let bytes: Vec<u8> = bytes.into();
        let source = Source::Memory {
            bytes:       Arc::from(bytes),
            compression: options.compression.unwrap_or_default(),
        };
        Self::from_source(source, ftype, options)
    }

    fn from_source(
        source: Source,
        ftype: FileType,
        options: &ReaderOptions,
    ) -> anyhow::Result<Self> {
        let handle = source.open()?;
        let mut reader = Self {
            source,
            handle: Some(handle),
            ftype,
            delimit: options.delimit.clone(),
            comment: options.comment_prefix().map(str::to_string),
            meta: TsvMeta::new(),
            tell: 0,
            pos: 0,
            bed_index: 1,
            line_no: 0,
            tell_line: 0,
            exhausted: false,
        };

        reader.skip_lines(options.skip)?;
        reader.checkpoint();

        match ftype {
            FileType::Base => {},
            FileType::Bed | FileType::Bed12 | FileType::Bedpe => {
                reader.meta = ftype.meta();
            },
            FileType::Bedx => {
                reader.meta = ftype.meta();
                reader.meta.add(options.xcols.iter().cloned());
            },
            FileType::Head => reader.read_header(options)?,
            FileType::Nometa => {
                if options.head {
                    reader.read_header(options)?;
                }
            },
        }

        if !options.cnames.is_empty() {
            reader.meta.add(options.cnames.iter().cloned());
        }

        debug!(
            "Opened {} reader on {} with {}",
            ftype,
            reader.source.describe(),
            reader.meta
        );
        Ok(reader)
    }

    fn handle(&mut self) -> anyhow::Result<&mut Handle> {
        match self.handle.as_mut() {
            Some(handle) => Ok(handle),
            None => bail!("Reader on {} is closed", self.source.describe()),
        }
    }

    /// Reads one raw line including its terminator. Empty at end of file.
    fn read_raw_line(&mut self) -> anyhow::Result<String> {
        let mut buf = String::new();
        let n = self
            .handle()?
            .read_line(&mut buf)
            .with_context(|| {
                format!(
                    "Failed to read line {} of {}",
                    self.line_no + 1,
                    self.source.describe()
                )
            })?;
        self.pos += n as u64;
        if n > 0 {
            self.line_no += 1;
        }
        Ok(buf)
    }

    fn is_comment(
        &self,
        line: &str,
    ) -> bool {
        self.comment
            .as_deref()
            .map(|c| line.starts_with(c))
            .unwrap_or(false)
    }

    /// Reads the next line that is not a comment, without its terminator.
    /// `None` at end of file.
    fn read_data_line(&mut self) -> anyhow::Result<Option<String>> {
        loop {
            let line = self.read_raw_line()?;
            if line.is_empty() {
                return Ok(None);
            }
            if self.is_comment(&line) {
                continue;
            }
            return Ok(Some(strip_eol(&line).to_string()));
        }
    }

    fn skip_lines(
        &mut self,
        n: usize,
    ) -> anyhow::Result<()> {
        for _ in 0..n {
            if self.read_data_line()?.is_none() {
                break;
            }
        }
        Ok(())
    }

    /// Takes column names from the next line and detects the row-name
    /// column by peeking at the first data row.
    fn read_header(
        &mut self,
        options: &ReaderOptions,
    ) -> anyhow::Result<()> {
        let header_line = self.read_raw_line()?;
        let mut header = header_line
            .trim_matches(|c| matches!(c, '#' | '\t' | '\n' | '\r' | ' '))
            .split(self.delimit.as_str())
            .map(str::to_string)
            .collect_vec();
        self.checkpoint();

        if let Some(row1) = self.read_data_line()? {
            let width = row1.trim().split(self.delimit.as_str()).count();
            if width == header.len() + 1 {
                header.insert(0, "ROWNAMES".to_string());
            }
            else if width != header.len() {
                warn!(
                    "Header of {} has {} columns but the first row has {}",
                    self.source.describe(),
                    header.len(),
                    width
                );
            }
        }

        self.meta = header
            .into_iter()
            .map(|name| {
                let converter = options.tmeta.get(&name).cloned();
                Column::from((name, converter))
            })
            .collect();
        self.rewind()
    }

    /// Derives placeholder columns `{prefix}1..{prefix}n` from the width of
    /// the first data line, then rewinds.
    pub fn auto_meta(
        &mut self,
        prefix: &str,
    ) -> anyhow::Result<()> {
        let line = self.read_data_line()?.unwrap_or_default();
        self.rewind()?;
        let width = line.split(self.delimit.as_str()).count();
        self.meta
            .add((1..=width).map(|i| format!("{}{}", prefix, i)));
        debug!(
            "Derived {} placeholder columns for {}",
            width,
            self.source.describe()
        );
        Ok(())
    }

    fn checkpoint(&mut self) {
        self.tell = self.pos;
        self.tell_line = self.line_no;
    }

    /// Resets the read position to the checkpoint after the skipped region.
    pub fn rewind(&mut self) -> anyhow::Result<()> {
        match self.handle.as_mut() {
            Some(Handle::Seekable(inner)) => {
                inner.seek(SeekFrom::Start(self.tell))?;
            },
            Some(Handle::Stream(_)) => {
                let mut handle = self.source.open()?;
                if let Handle::Stream(inner) = &mut handle {
                    io::copy(&mut inner.take(self.tell), &mut io::sink())?;
                }
                self.handle = Some(handle);
            },
            None => bail!("Reader on {} is closed", self.source.describe()),
        }
        self.pos = self.tell;
        self.line_no = self.tell_line;
        self.exhausted = false;
        Ok(())
    }

    fn parse(
        &mut self,
        line: &str,
    ) -> anyhow::Result<Row> {
        let fields = line.split(self.delimit.as_str()).collect_vec();
        match self.ftype {
            FileType::Nometa => {
                Ok(Row::Raw(fields.into_iter().map(str::to_string).collect()))
            },
            FileType::Bed => self.parse_bed(&fields).map(Row::Record),
            _ => self.parse_fields(&fields, &[]).map(Row::Record),
        }
    }

    /// Applies the schema positionally. Fields missing at the end become
    /// empty strings; so do empty fields of the `optional` columns.
    fn parse_fields(
        &self,
        fields: &[&str],
        optional: &[&str],
    ) -> anyhow::Result<TsvRecord> {
        let mut record = TsvRecord::with_capacity(self.meta.len());
        for (i, key) in self.meta.keys().enumerate() {
            let value = match fields.get(i) {
                Some(text) if !(text.is_empty() && optional.contains(&key)) => {
                    self.meta.convert_at(i, text)?
                },
                _ => Value::default(),
            };
            record.set(key, value);
        }
        Ok(record)
    }

    fn parse_bed(
        &mut self,
        fields: &[&str],
    ) -> anyhow::Result<TsvRecord> {
        let mut record = self.parse_fields(fields, &BED_OPTIONAL)?;
        if record
            .get("NAME")
            .map_or(true, Value::is_empty)
        {
            record.set("NAME", format!("BED{}", self.bed_index));
            self.bed_index += 1;
        }
        if record
            .get("SCORE")
            .map_or(true, Value::is_empty)
        {
            record.set("SCORE", 0.0);
        }
        if record
            .get("STRAND")
            .map_or(true, Value::is_empty)
        {
            record.set("STRAND", "+");
        }
        Ok(record)
    }

    /// Produces the next row, `None` at end of file or at a blank line.
    pub fn next_row(&mut self) -> anyhow::Result<Option<Row>> {
        if self.exhausted {
            return Ok(None);
        }
        if self.meta.is_empty() && self.ftype == FileType::Base {
            self.auto_meta("COL")?;
        }
        let line = match self.read_data_line()? {
            Some(line) if !line.is_empty() => line,
            _ => {
                self.exhausted = true;
                return Ok(None);
            },
        };
        let line_no = self.line_no;
        self.parse(&line)
            .map(Some)
            .with_context(|| {
                format!(
                    "Failed to parse line {} of {}: {:?}",
                    line_no,
                    self.source.describe(),
                    line
                )
            })
    }

    /// Like [`TsvReader::next_row`], for readers that yield records.
    pub fn next_record(&mut self) -> anyhow::Result<Option<TsvRecord>> {
        match self.next_row()? {
            Some(Row::Record(record)) => Ok(Some(record)),
            Some(Row::Raw(_)) => {
                bail!("{} reader yields raw rows, not records", self.ftype)
            },
            None => Ok(None),
        }
    }

    /// Iterates over records; errors on schema-less readers.
    pub fn records(&mut self) -> impl Iterator<Item = anyhow::Result<TsvRecord>> + '_ {
        std::iter::from_fn(move || self.next_record().transpose())
    }

    /// Reads every remaining row.
    pub fn dump(&mut self) -> anyhow::Result<Vec<Row>> {
        self.by_ref().collect()
    }

    pub fn meta(&self) -> &TsvMeta {
        &self.meta
    }

    /// For injecting or extending columns after construction.
    pub fn meta_mut(&mut self) -> &mut TsvMeta {
        &mut self.meta
    }

    pub fn ftype(&self) -> FileType {
        self.ftype
    }

    pub fn delimit(&self) -> &str {
        &self.delimit
    }

    pub fn is_closed(&self) -> bool {
        self.handle.is_none()
    }

    /// Releases the file handle. Calling it again is a no-op.
    pub fn close(&mut self) {
        if self.handle.take().is_some() {
            debug!("Closed reader on {}", self.source.describe());
        }
    }
}

impl Iterator for TsvReader {
    type Item = anyhow::Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_row().transpose()
    }
}

impl Drop for TsvReader {
    fn drop(&mut self) {
        self.close();
    }
}

fn strip_eol(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}
