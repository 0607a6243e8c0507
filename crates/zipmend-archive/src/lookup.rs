use std::fs::File;
use std::path::Path;

use tracing::debug;
use zip::ZipWriter;

use crate::error::{Error, Result};
use crate::handle::ReadHandle;
use crate::query::{EntryMatch, EntryQuery};

/// Create an empty archive at `path`.
///
/// Update operations require the archive to exist; this is how callers make
/// one. Fails if something already exists at `path`.
pub fn create_archive(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = File::create_new(path).map_err(|e| Error::io(path, e))?;
    ZipWriter::new(file)
        .finish()
        .map_err(|e| Error::zip(path, e))?;
    debug!(archive = %path.display(), "created empty archive");
    Ok(())
}

/// Every entry of the archive, in enumeration order.
pub fn list_entries(archive: impl AsRef<Path>) -> Result<Vec<EntryMatch>> {
    let mut handle = ReadHandle::open(archive.as_ref())?;
    (0..handle.len()).map(|i| handle.describe(i)).collect()
}

/// First entry, in enumeration order, matching `query`.
///
/// A plain string is a substring query; see [`EntryQuery`].
pub fn find_entry(
    archive: impl AsRef<Path>,
    query: impl Into<EntryQuery>,
) -> Result<Option<EntryMatch>> {
    let query = query.into();
    let mut handle = ReadHandle::open(archive.as_ref())?;
    let found = handle.find(&query)?;
    debug!(
        archive = %handle.path().display(),
        %query,
        found = found.as_ref().map(|m| m.name.as_str()),
        "looked up entry"
    );
    Ok(found)
}

/// Whether any entry matches `query`.
pub fn exists(archive: impl AsRef<Path>, query: impl Into<EntryQuery>) -> Result<bool> {
    find_entry(archive, query).map(|found| found.is_some())
}
