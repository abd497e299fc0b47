//! Error types for flatsync-core

use flatsync_fs::NormalizedPath;

/// Result type for flatsync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while synchronizing records
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The record kind was configured without a default target
    #[error("Record kind {kind} has no default target")]
    MissingDefaultTarget { kind: String },

    /// Backing file content could not be parsed
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// A record could not be rendered back to text
    #[error("Invalid value for {attr}: {message}")]
    InvalidValue { attr: String, message: String },

    /// Prefetch of one target failed; the whole cycle is aborted
    #[error("Failed to prefetch {target}: {source}")]
    Prefetch {
        target: NormalizedPath,
        #[source]
        source: Box<Error>,
    },

    /// Rendering or writing a dirty target failed; it stays dirty
    #[error("Failed to flush {target}: {source}")]
    Flush {
        target: NormalizedPath,
        #[source]
        source: Box<Error>,
    },

    /// No desired instance is registered under this name
    #[error("Unknown instance: {name}")]
    UnknownInstance { name: String },

    /// The attribute names the record and cannot be written
    #[error("Attribute {attr} is the record name and cannot be changed")]
    ReadOnly { attr: String },

    /// `ensure` only accepts `present` or `absent`
    #[error("Invalid ensure value: {value}")]
    InvalidEnsure { value: String },

    /// Filesystem error from flatsync-fs
    #[error(transparent)]
    Fs(#[from] flatsync_fs::Error),
}
