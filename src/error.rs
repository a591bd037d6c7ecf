use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the library
///
/// Unparsable literals and types missing from the index are not errors: they are
/// logged and the scan continues with a degraded schema.
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse {file}: {message}")]
    Parse { file: PathBuf, message: String },

    #[error("invalid type signature `{signature}`: {message}")]
    InvalidSignature { signature: String, message: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A reference or schema was looked up for a type key that was never registered.
    #[error("type `{0}` has not been registered")]
    NotRegistered(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    /// An invariant of the walk was violated; the whole scan is aborted.
    #[error("scan of `{root}` failed: {message}")]
    Fatal { root: String, message: String },
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(format!("JSON: {}", err))
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Serialization(format!("YAML: {}", err))
    }
}
