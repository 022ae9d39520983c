use std::fmt::Debug;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{
    Deserialize,
    Serialize,
};

use super::format::FileType;
use crate::data_structs::{
    Column,
    Converter,
};
use crate::error::TsvError;
use crate::io::compression::Compression;

fn default_delimit() -> String {
    "\t".to_string()
}

fn default_comment() -> Option<String> {
    Some("#".to_string())
}

fn default_true() -> bool {
    true
}

fn check_delimit(delimit: &str) -> Result<(), TsvError> {
    if delimit.is_empty() {
        return Err(TsvError::InvalidOption(
            "delimiter must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Options of [`TsvReader`](super::TsvReader).
///
/// | field       | default | meaning                                            |
/// |-------------|---------|----------------------------------------------------|
/// | `delimit`   | `"\t"`  | field separator                                    |
/// | `comment`   | `"#"`   | lines starting with it are skipped; `None` disables |
/// | `skip`      | `0`     | leading non-comment lines dropped before data      |
/// | `ftype`     | none    | format tag, see [`FileType`]                       |
/// | `cnames`    | `[]`    | columns appended after the format schema           |
/// | `xcols`     | `[]`    | extra columns of the `bedx` format                 |
/// | `tmeta`     | `{}`    | converters for `head`/`nometa` columns by name     |
/// | `head`      | `true`  | whether a `nometa` file has a header line          |
/// | `compression` | by suffix | overrides suffix-based detection             |
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderOptions {
    #[serde(default = "default_delimit")]
    pub delimit:     String,
    #[serde(default = "default_comment")]
    pub comment:     Option<String>,
    pub skip:        usize,
    pub ftype:       Option<String>,
    pub cnames:      Vec<Column>,
    pub xcols:       Vec<Column>,
    pub tmeta:       IndexMap<String, Converter>,
    #[serde(default = "default_true")]
    pub head:        bool,
    pub compression: Option<Compression>,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            delimit:     default_delimit(),
            comment:     default_comment(),
            skip:        0,
            ftype:       None,
            cnames:      Vec::new(),
            xcols:       Vec::new(),
            tmeta:       IndexMap::new(),
            head:        true,
            compression: None,
        }
    }
}

impl ReaderOptions {
    pub fn with_delimit(
        mut self,
        delimit: &str,
    ) -> Self {
        self.delimit = delimit.to_string();
        self
    }

    pub fn with_comment(
        mut self,
        comment: Option<&str>,
    ) -> Self {
        self.comment = comment.map(str::to_string);
        self
    }

    pub fn with_skip(
        mut self,
        skip: usize,
    ) -> Self {
        self.skip = skip;
        self
    }

    pub fn with_ftype(
        mut self,
        ftype: &str,
    ) -> Self {
        self.ftype = Some(ftype.to_string());
        self
    }

    pub fn with_cnames<I, C>(
        mut self,
        cnames: I,
    ) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Column>, {
        self.cnames = cnames.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_xcols<I, C>(
        mut self,
        xcols: I,
    ) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Column>, {
        self.xcols = xcols.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_tmeta<I, S>(
        mut self,
        tmeta: I,
    ) -> Self
    where
        I: IntoIterator<Item = (S, Converter)>,
        S: Into<String>, {
        self.tmeta = tmeta
            .into_iter()
            .map(|(k, v)| (k.into(), v))
            .collect();
        self
    }

    pub fn with_head(
        mut self,
        head: bool,
    ) -> Self {
        self.head = head;
        self
    }

    pub fn with_compression(
        mut self,
        compression: Compression,
    ) -> Self {
        self.compression = Some(compression);
        self
    }

    /// Comment prefix, with an empty prefix treated as disabled.
    pub(crate) fn comment_prefix(&self) -> Option<&str> {
        self.comment
            .as_deref()
            .filter(|c| !c.is_empty())
    }

    /// Validates the options and resolves the format tag.
    pub fn validate(&self) -> Result<FileType, TsvError> {
        check_delimit(&self.delimit)?;
        FileType::for_reader(self.ftype.as_deref().unwrap_or_default())
    }
}

/// Options of [`TsvWriter`](super::TsvWriter).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterOptions {
    #[serde(default = "default_delimit")]
    pub delimit:           String,
    pub ftype:             Option<String>,
    pub cnames:            Vec<Column>,
    pub compression:       Option<Compression>,
    pub compression_level: u32,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            delimit:           default_delimit(),
            ftype:             None,
            cnames:            Vec::new(),
            compression:       None,
            compression_level: 6,
        }
    }
}

impl WriterOptions {
    pub fn with_delimit(
        mut self,
        delimit: &str,
    ) -> Self {
        self.delimit = delimit.to_string();
        self
    }

    pub fn with_ftype(
        mut self,
        ftype: &str,
    ) -> Self {
        self.ftype = Some(ftype.to_string());
        self
    }

    pub fn with_cnames<I, C>(
        mut self,
        cnames: I,
    ) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Column>, {
        self.cnames = cnames.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_compression(
        mut self,
        compression: Compression,
        level: u32,
    ) -> Self {
        self.compression = Some(compression);
        self.compression_level = level;
        self
    }

    pub fn validate(&self) -> Result<FileType, TsvError> {
        check_delimit(&self.delimit)?;
        if self.compression_level > 9 {
            return Err(TsvError::InvalidOption(format!(
                "compression level must be within 0..=9, got {}",
                self.compression_level
            )));
        }
        FileType::for_writer(self.ftype.as_deref().unwrap_or_default())
    }
}

type BulkTransform = dyn Fn(Vec<String>) -> Vec<String> + Send + Sync;
type KeyTransform = dyn Fn(&str) -> String + Send + Sync;

/// Renaming applied to column names before a header line is written.
#[derive(Clone)]
pub enum HeadTransform {
    /// Receives all names at once.
    Bulk(Arc<BulkTransform>),
    /// Applied to matching names only.
    PerKey(IndexMap<String, Arc<KeyTransform>>),
}

impl HeadTransform {
    pub fn bulk<F>(func: F) -> Self
    where
        F: Fn(Vec<String>) -> Vec<String> + Send + Sync + 'static, {
        HeadTransform::Bulk(Arc::new(func))
    }

    pub fn per_key<I, S, F>(funcs: I) -> Self
    where
        I: IntoIterator<Item = (S, F)>,
        S: Into<String>,
        F: Fn(&str) -> String + Send + Sync + 'static, {
        HeadTransform::PerKey(
            funcs
                .into_iter()
                .map(|(k, f)| (k.into(), Arc::new(f) as Arc<KeyTransform>))
                .collect(),
        )
    }

    /// Plain renaming of selected columns.
    pub fn rename<I, S, T>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<String>, {
        Self::per_key(pairs.into_iter().map(|(from, to)| {
            let to: String = to.into();
            (from, move |_: &str| to.clone())
        }))
    }

    pub fn apply(
        &self,
        keys: Vec<String>,
    ) -> Vec<String> {
        match self {
            HeadTransform::Bulk(func) => func(keys),
            HeadTransform::PerKey(funcs) => {
                keys.into_iter()
                    .map(|key| {
                        match funcs.get(&key) {
                            Some(func) => func(&key),
                            None => key,
                        }
                    })
                    .collect()
            },
        }
    }
}

impl Debug for HeadTransform {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            HeadTransform::Bulk(_) => write!(f, "HeadTransform::Bulk"),
            HeadTransform::PerKey(funcs) => {
                f.debug_tuple("HeadTransform::PerKey")
                    .field(&funcs.keys().collect::<Vec<_>>())
                    .finish()
            },
        }
    }
}

/// How the header line of an output is written.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadOptions {
    #[serde(default = "default_true")]
    pub head:      bool,
    pub prefix:    String,
    /// Header delimiter; the body delimiter when unset.
    pub delimit:   Option<String>,
    #[serde(skip)]
    pub transform: Option<HeadTransform>,
}

impl Default for HeadOptions {
    fn default() -> Self {
        Self {
            head:      true,
            prefix:    String::new(),
            delimit:   None,
            transform: None,
        }
    }
}

impl HeadOptions {
    pub fn with_head(
        mut self,
        head: bool,
    ) -> Self {
        self.head = head;
        self
    }

    pub fn with_prefix(
        mut self,
        prefix: &str,
    ) -> Self {
        self.prefix = prefix.to_string();
        self
    }

    pub fn with_delimit(
        mut self,
        delimit: &str,
    ) -> Self {
        self.delimit = Some(delimit.to_string());
        self
    }

    pub fn with_transform(
        mut self,
        transform: HeadTransform,
    ) -> Self {
        self.transform = Some(transform);
        self
    }
}
