use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to create directory '{path}': {source}")]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("failed to stage a replacement for '{path}': {source}")]
    Stage { path: PathBuf, source: io::Error },

    #[error("failed to write '{path}': {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to replace '{path}': {source}")]
    Replace { path: PathBuf, source: io::Error },

    #[error("'{path}' does not name a file")]
    NotAFile { path: PathBuf },
}

impl Error {
    /// The path the failed operation was working on.
    pub fn path(&self) -> &Path {
        match self {
            Self::CreateDir { path, .. }
            | Self::Stage { path, .. }
            | Self::Write { path, .. }
            | Self::Replace { path, .. }
            | Self::NotAFile { path } => path,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
