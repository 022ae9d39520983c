use std::fmt::Display;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{
    anyhow,
    Context,
};
use itertools::Itertools;
use log::{
    debug,
    warn,
};

use super::format::FileType;
use super::options::{
    HeadOptions,
    WriterOptions,
};
use crate::data_structs::{
    RecordLike,
    Row,
    TsvMeta,
};
use crate::error::TsvError;
use crate::io::compression::{
    Compression,
    Encoder,
};

/// Writes records to a delimited text sink, picking and ordering fields by
/// its schema.
pub struct TsvWriter {
    /// Destination description for messages
    target:  String,
    /// Buffered (and possibly compressing) sink; `None` once closed
    sink:    Option<Encoder<Box<dyn Write>>>,
    ftype:   FileType,
    delimit: String,
    meta:    TsvMeta,
}

impl TsvWriter {
    /// Creates `path` with the writer selected by `options.ftype`.
    /// Output is gzip-compressed when the name ends in `.gz`.
    ///
    /// Unknown format tags fail with
    /// [`TsvError::NoSuchWriter`] before the file is created.
    pub fn open<P: AsRef<Path>>(
        path: P,
        options: &WriterOptions,
    ) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let ftype = options.validate()?;
        let compression = options
            .compression
            .unwrap_or_else(|| Compression::from_path(path));
        let handle = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        Ok(Self::build(
            Box::new(handle),
            path.display().to_string(),
            ftype,
            compression,
            options,
        ))
    }

    /// Writes to any sink, uncompressed unless `options.compression` says
    /// otherwise.
    pub fn from_writer<W: Write + 'static>(
        sink: W,
        options: &WriterOptions,
    ) -> anyhow::Result<Self> {
        let ftype = options.validate()?;
        Ok(Self::build(
            Box::new(sink),
            "<writer>".to_string(),
            ftype,
            options.compression.unwrap_or_default(),
            options,
        ))
    }

    fn build(
        sink: Box<dyn Write>,
        target: String,
        ftype: FileType,
        compression: Compression,
        options: &WriterOptions,
    ) -> Self {
        let mut meta = ftype.meta();
        meta.add(options.cnames.iter().cloned());
        debug!(
            "Opened {} writer on {} ({}) with {}",
            ftype,
            target,
            compression.name(),
            meta
        );
        Self {
            target,
            sink: Some(compression.get_encoder(sink, options.compression_level)),
            ftype,
            delimit: options.delimit.clone(),
            meta,
        }
    }

    fn sink(&mut self) -> anyhow::Result<&mut Encoder<Box<dyn Write>>> {
        match self.sink.as_mut() {
            Some(sink) => Ok(sink),
            None => Err(anyhow!("Writer on {} is closed", self.target)),
        }
    }

    fn write_line(
        &mut self,
        line: &str,
    ) -> anyhow::Result<()> {
        let sink = self.sink()?;
        sink.write_all(line.as_bytes())?;
        sink.write_all(b"\n")?;
        Ok(())
    }

    /// Writes the schema's column names as a header line.
    pub fn write_head(
        &mut self,
        head: &HeadOptions,
    ) -> anyhow::Result<()> {
        let keys = self.meta.names();
        self.write_head_with(keys, head)
    }

    /// Writes arbitrary names as a header line, regardless of the schema.
    pub fn write_head_with<I, K>(
        &mut self,
        keys: I,
        head: &HeadOptions,
    ) -> anyhow::Result<()>
    where
        I: IntoIterator<Item = K>,
        K: Display, {
        let mut keys = keys
            .into_iter()
            .map(|k| k.to_string())
            .collect_vec();
        if let Some(transform) = head.transform.as_ref() {
            keys = transform.apply(keys);
        }
        let delimit = head
            .delimit
            .as_deref()
            .unwrap_or(self.delimit.as_str());
        let line = format!("{}{}", head.prefix, keys.join(delimit));
        self.write_line(&line)
    }

    /// Writes the schema's fields of `record`, in schema order.
    ///
    /// Fails with [`TsvError::MissingField`] if `record` lacks one of them.
    pub fn write<R: RecordLike + ?Sized>(
        &mut self,
        record: &R,
    ) -> anyhow::Result<()> {
        let fields = self
            .meta
            .keys()
            .map(|key| {
                record
                    .lookup(key)
                    .ok_or_else(|| TsvError::MissingField(key.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let line = fields.join(&self.delimit);
        self.write_line(&line)
    }

    /// Writes values positionally, without consulting the schema.
    pub fn write_fields<I, V>(
        &mut self,
        fields: I,
    ) -> anyhow::Result<()>
    where
        I: IntoIterator<Item = V>,
        V: Display, {
        let line = fields.into_iter().join(&self.delimit);
        self.write_line(&line)
    }

    /// Writes a row as produced by a reader. Raw rows, and any row given to
    /// a schema-less writer, are written positionally.
    pub fn write_row(
        &mut self,
        row: &Row,
    ) -> anyhow::Result<()> {
        match row {
            Row::Record(record) if self.ftype != FileType::Nometa => {
                self.write(record)
            },
            Row::Record(record) => self.write_fields(record.values()),
            Row::Raw(fields) => self.write_fields(fields),
        }
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
        self.sink.is_none()
    }

    /// Flushes and finishes the output. Calling it again is a no-op.
    pub fn close(&mut self) -> anyhow::Result<()> {
        if let Some(sink) = self.sink.take() {
            let mut inner = sink
                .finish()
                .with_context(|| format!("Failed to finish {}", self.target))?;
            inner.flush()?;
            debug!("Closed writer on {}", self.target);
        }
        Ok(())
    }
}

impl Drop for TsvWriter {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!("Failed to close writer on {}: {:#}", self.target, e);
        }
    }
}
