use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("'{0}' is not a usable file name")]
    InvalidName(String),

    #[error("'{path}' has no parent directory")]
    NoParent { path: PathBuf },

    #[error("'{path}' is not inside '{base}'")]
    Containment { base: PathBuf, path: PathBuf },

    #[error("invalid archive path '{path}': {reason}")]
    InvalidArchivePath { path: String, reason: &'static str },

    #[error("failed to read current directory: {source}")]
    CurrentDir { source: std::io::Error },
}
