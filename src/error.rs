use thiserror::Error;

/// Errors raised by the readers, writers and the synchronized scan.
///
/// Public operations return [`anyhow::Result`]; these variants travel inside
/// the `anyhow::Error` and can be recovered with
/// `err.downcast_ref::<TsvError>()`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TsvError {
    /// Requested reader format is not in the registry.
    #[error("No such reader: {0}")]
    NoSuchReader(String),
    /// Requested writer format is not in the registry.
    #[error("No such writer: {0}")]
    NoSuchWriter(String),
    /// A converter was referenced by a name that does not resolve.
    #[error("Expect callable for meta value, got unknown converter '{0}'")]
    UnknownConverter(String),
    /// `SimRead::run` was called without a per-match callback.
    #[error("You would like to do something when lines are matched.")]
    MissingCallback,
    /// A record handed to a writer lacks a column of the writer's schema.
    #[error("Missing field '{0}' in record")]
    MissingField(String),
    /// An option failed validation at construction time.
    #[error("Invalid option: {0}")]
    InvalidOption(String),
    /// A match function pointed at a stream that does not exist.
    #[error("Match function returned stream index {index}, but only {n} streams are open")]
    MatchIndexOutOfRange { index: usize, n: usize },
}
