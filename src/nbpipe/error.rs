use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NbError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("IO error at {}: {source}", path.display())]
    PathIo {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        source: glob::PatternError,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Conversion failed: {0}")]
    Conversion(String),
}

impl NbError {
    /// Wraps an IO error with the path that caused it.
    pub fn at(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        NbError::PathIo {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, NbError>;
