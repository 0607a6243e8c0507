use std::io;
use std::path::{Path, PathBuf};

use zip::result::ZipError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("archive not found: '{path}'")]
    ArchiveNotFound { path: PathBuf },

    #[error("archive '{path}' is corrupted: {source}")]
    Corrupted { path: PathBuf, source: ZipError },

    #[error("no entry in '{archive}' matches {query}")]
    EntryNotFound { archive: PathBuf, query: String },

    #[error("entry '{entry}' would be written outside the destination")]
    UnsafeEntry { entry: String },

    #[error("source directory not found: '{path}'")]
    SourceNotFound { path: PathBuf },

    #[error("failed to access '{path}': {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Path(#[from] zipmend_path::Error),

    #[error(transparent)]
    Fs(#[from] zipmend_fs::Error),
}

/// Coarse classification of an [`Error`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidPath,
    Containment,
    ArchiveNotFound,
    CorruptArchive,
    EntryNotFound,
    Io,
}

impl Error {
    pub(crate) fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// I/O failures reported by the zip crate keep their kind; everything
    /// else it reports means the container could not be parsed.
    pub(crate) fn zip(path: impl AsRef<Path>, err: ZipError) -> Self {
        let path = path.as_ref().to_path_buf();
        match err {
            ZipError::Io(source) => Self::Io { path, source },
            source => Self::Corrupted { path, source },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ArchiveNotFound { .. } => ErrorKind::ArchiveNotFound,
            Self::Corrupted { .. } => ErrorKind::CorruptArchive,
            Self::EntryNotFound { .. } => ErrorKind::EntryNotFound,
            Self::UnsafeEntry { .. } => ErrorKind::InvalidPath,
            Self::Path(zipmend_path::Error::Containment { .. }) => ErrorKind::Containment,
            Self::Path(zipmend_path::Error::CurrentDir { .. }) => ErrorKind::Io,
            Self::Path(_) => ErrorKind::InvalidPath,
            Self::SourceNotFound { .. } | Self::Io { .. } | Self::Fs(_) => ErrorKind::Io,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
