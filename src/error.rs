use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading, rewriting or generating vault files.
#[derive(Debug, Error)]
pub enum VaultError {
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Setup problems (bad root, bad config file). Fatal before any mutation.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("template {path:?} is unusable: {message}")]
    Template { path: PathBuf, message: String },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
}

impl VaultError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        VaultError::Io {
            path: path.into(),
            source,
        }
    }

    /// True for errors that must abort a run instead of being counted.
    pub fn is_fatal(&self) -> bool {
        matches!(self, VaultError::Config(_) | VaultError::Template { .. })
    }
}

pub type Result<T> = std::result::Result<T, VaultError>;
