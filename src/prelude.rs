pub use crate::data_structs::{
    Column,
    Converter,
    RecordLike,
    Row,
    TsvMeta,
    TsvRecord,
    Value,
};
pub use crate::error::TsvError;
pub use crate::io::compression::Compression;
pub use crate::io::tsv::{
    compare,
    default_match,
    tsv_copy,
    tsv_ops,
    ColType,
    FileType,
    HeadOptions,
    HeadTransform,
    MatchResult,
    PerStream,
    ReaderOptions,
    SimRead,
    SimReadBuilder,
    TsvReader,
    TsvWriter,
    WriterOptions,
};
