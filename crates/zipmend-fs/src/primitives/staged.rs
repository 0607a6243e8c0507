use std::io::{self, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::{Error, Result, StageOptions};

/// A temporary file next to `target` that replaces it on [`StagedFile::commit`].
///
/// Dropping an uncommitted `StagedFile` removes the temporary file; the
/// target is never touched until commit.
pub struct StagedFile {
    target: PathBuf,
    file: NamedTempFile,
    options: StageOptions,
}

impl StagedFile {
    pub fn beside(target: impl AsRef<Path>, options: StageOptions) -> Result<Self> {
        let target = target.as_ref();
        let name = target.file_name().ok_or_else(|| Error::NotAFile {
            path: target.to_path_buf(),
        })?;
        let parent = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let file = tempfile::Builder::new()
            .prefix(&format!("{}{}", options.prefix_str(), name.to_string_lossy()))
            .suffix(options.suffix_str())
            .tempfile_in(parent)
            .map_err(|source| Error::Stage {
                path: target.to_path_buf(),
                source,
            })?;

        Ok(Self {
            target: target.to_path_buf(),
            file,
            options,
        })
    }

    /// Location of the temporary file.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Move the staged content over the target.
    ///
    /// An existing target hands its permissions to the replacement.
    pub fn commit(self) -> Result<()> {
        let Self {
            target,
            file,
            options,
        } = self;

        let write_err = |source| Error::Write {
            path: file.path().to_path_buf(),
            source,
        };

        if options.sync_enabled() {
            file.as_file().sync_all().map_err(write_err)?;
        }
        if let Ok(metadata) = std::fs::metadata(&target) {
            std::fs::set_permissions(file.path(), metadata.permissions()).map_err(write_err)?;
        }

        file.persist(&target).map_err(|e| Error::Replace {
            path: target.clone(),
            source: e.error,
        })?;
        Ok(())
    }
}

impl Write for StagedFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl Seek for StagedFile {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.file.seek(pos)
    }
}
