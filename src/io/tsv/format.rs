use std::collections::HashMap;
use std::fmt::Display;

use itertools::Itertools;
use once_cell::sync::Lazy;

use crate::data_structs::{
    Column,
    Converter,
    TsvMeta,
};
use crate::error::TsvError;

/// Type of a fixed-format column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColType {
    Str,
    Int,
    Float,
}

impl ColType {
    pub fn converter(&self) -> Option<Converter> {
        match self {
            ColType::Str => None,
            ColType::Int => Some(Converter::int()),
            ColType::Float => Some(Converter::float()),
        }
    }
}

/// Supported delimited file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    /// Plain delimited text, schema supplied or derived as `COL1..COLn`
    Base,
    /// BED6 with defaults for name, score and strand
    Bed,
    /// BED12 with thick and block columns
    Bed12,
    /// Paired-end BED
    Bedpe,
    /// BED6 plus caller-supplied extra columns
    Bedx,
    /// Column names taken from the first line
    Head,
    /// Rows returned as raw field lists
    Nometa,
}

static REGISTRY: Lazy<HashMap<&'static str, FileType>> = Lazy::new(|| {
    HashMap::from_iter([
        ("Base", FileType::Base),
        ("None", FileType::Base),
        ("Bed", FileType::Bed),
        ("Bed12", FileType::Bed12),
        ("Bedpe", FileType::Bedpe),
        ("Bedx", FileType::Bedx),
        ("Head", FileType::Head),
        ("Nometa", FileType::Nometa),
    ])
});

impl FileType {
    /// First letter upper case, the rest lower case: `bedPE` -> `Bedpe`.
    pub fn normalize(tag: &str) -> String {
        let mut chars = tag.trim().chars();
        match chars.next() {
            Some(first) => {
                first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect()
            },
            None => String::new(),
        }
    }

    /// Looks a tag up in the registry. The empty tag is the base format.
    pub fn lookup(tag: &str) -> Option<FileType> {
        let normalized = Self::normalize(tag);
        if normalized.is_empty() {
            return Some(FileType::Base);
        }
        REGISTRY
            .get(normalized.as_str())
            .copied()
    }

    pub fn for_reader(tag: &str) -> Result<FileType, TsvError> {
        Self::lookup(tag).ok_or_else(|| {
            TsvError::NoSuchReader(format!("TsvReader{}", Self::normalize(tag)))
        })
    }

    pub fn for_writer(tag: &str) -> Result<FileType, TsvError> {
        Self::lookup(tag)
            .filter(FileType::has_writer)
            .ok_or_else(|| {
                TsvError::NoSuchWriter(format!("TsvWriter{}", Self::normalize(tag)))
            })
    }

    /// Only base, BED and schema-less outputs have dedicated writers.
    pub fn has_writer(&self) -> bool {
        matches!(self, FileType::Base | FileType::Bed | FileType::Nometa)
    }

    /// Whether the schema comes from the file's first line.
    pub fn has_header(&self) -> bool {
        matches!(self, FileType::Head | FileType::Nometa)
    }

    /// Returns fixed column names for this format. Empty for formats whose
    /// columns are derived or supplied.
    pub const fn col_names(&self) -> &[&'static str] {
        match self {
            Self::Bed | Self::Bedx => {
                &["CHR", "START", "END", "NAME", "SCORE", "STRAND"]
            },
            Self::Bed12 => {
                &[
                    "CHR",
                    "START",
                    "END",
                    "NAME",
                    "SCORE",
                    "STRAND",
                    "THICKSTART",
                    "THICKEND",
                    "ITEMRGB",
                    "BLOCKCOUNT",
                    "BLOCKSIZES",
                    "BLOCKSTARTS",
                ]
            },
            Self::Bedpe => {
                &[
                    "CHR1", "START1", "END1", "CHR2", "START2", "END2", "NAME",
                    "SCORE", "STRAND1", "STRAND2",
                ]
            },
            Self::Base | Self::Head | Self::Nometa => &[],
        }
    }

    /// Returns types for each fixed column.
    pub const fn col_types(&self) -> &[ColType] {
        use ColType::*;
        match self {
            Self::Bed | Self::Bedx => &[Str, Int, Int, Str, Float, Str],
            Self::Bed12 => {
                &[
                    Str, // CHR
                    Int, // START
                    Int, // END
                    Str, // NAME
                    Float, // SCORE
                    Str, // STRAND
                    Int, // THICKSTART
                    Int, // THICKEND
                    Str, // ITEMRGB
                    Int, // BLOCKCOUNT
                    Str, // BLOCKSIZES
                    Str, // BLOCKSTARTS
                ]
            },
            Self::Bedpe => {
                &[Str, Int, Int, Str, Int, Int, Str, Float, Str, Str]
            },
            Self::Base | Self::Head | Self::Nometa => &[],
        }
    }

    /// Creates the fixed schema for this format.
    pub fn meta(&self) -> TsvMeta {
        self.col_names()
            .iter()
            .zip(self.col_types())
            .map(|(name, ty)| Column::from((*name, ty.converter())))
            .collect()
    }

    pub fn name(&self) -> &'static str {
        match self {
            FileType::Base => "base",
            FileType::Bed => "bed",
            FileType::Bed12 => "bed12",
            FileType::Bedpe => "bedpe",
            FileType::Bedx => "bedx",
            FileType::Head => "head",
            FileType::Nometa => "nometa",
        }
    }

    /// Names of every registered format.
    pub fn registered() -> Vec<&'static str> {
        REGISTRY
            .values()
            .map(FileType::name)
            .unique()
            .sorted()
            .collect_vec()
    }
}

impl Display for FileType {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
