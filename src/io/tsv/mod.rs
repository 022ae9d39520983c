//! Delimited text I/O: format registry, readers, writers, the synchronized
//! multi-file scan and the read-transform-write pipeline.

mod format;
mod ops;
mod options;
mod read;
mod simread;
mod write;

pub use format::{
    ColType,
    FileType,
};
pub use ops::{
    tsv_copy,
    tsv_ops,
    READER_FTYPE,
};
pub use options::{
    HeadOptions,
    HeadTransform,
    ReaderOptions,
    WriterOptions,
};
pub use read::TsvReader;
pub use simread::{
    compare,
    default_match,
    MatchResult,
    PerStream,
    SimRead,
    SimReadBuilder,
};
pub use write::TsvWriter;
