//! Error handling types and utilities.

use std::path::PathBuf;

/// A specialized Result type for index building operations.
pub type Result<T> = std::result::Result<T, IndexError>;

/// Errors that stop an index build.
///
/// Per-page failures are reported through [`PageLoadError`] instead and never
/// surface here.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// A `_searchIndexScopes` entry did not name a known scope.
    #[error("Invalid scope: {0}.")]
    InvalidScope(String),

    /// A configuration key was present but held the wrong kind of value.
    #[error("Invalid value for '{key}': expected {expected}")]
    InvalidOption { key: String, expected: &'static str },

    /// A section kind that has no member title label.
    #[error("Unsupported search scope: {0}.")]
    UnsupportedSection(String),

    /// The upstream search index artifact was not found.
    #[error("{} not found. Make sure the upstream search index stage finished successfully.", .0.display())]
    MissingIndexFile(PathBuf),

    #[error("Base directory can not be empty")]
    MissingOutputDirectory,

    #[error("Index build was cancelled")]
    Cancelled,

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid TOML in {}: {source}", path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl IndexError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}

/// Error returned when a single rendered page cannot be loaded.
///
/// The assembler logs these as warnings and skips the page.
#[derive(Debug, thiserror::Error)]
pub enum PageLoadError {
    #[error("Can't load content from {}: file not found", path.display())]
    NotFound { path: PathBuf },

    #[error("Can't load content from {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Can't load content from {}: {source}", path.display())]
    Encoding {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("Scan task for {} failed: {message}", path.display())]
    Task { path: PathBuf, message: String },
}

impl PageLoadError {
    /// Classifies a failed read of the page at `path`.
    pub(crate) fn io(path: PathBuf, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else {
            Self::Read { path, source }
        }
    }
}
