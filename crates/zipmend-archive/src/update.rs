//! Operations that rewrite an archive.
//!
//! Each call opens one [`UpdateHandle`], queues its edits and commits them
//! together, so a failure part-way leaves the archive as it was.

use std::io;
use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;
use zipmend_path::{ArchivePath, relative_to_with};

use crate::error::{Error, Result};
use crate::handle::UpdateHandle;
use crate::options::{MissingEntry, UpdateOptions};
use crate::query::EntryQuery;
use crate::report::UpdateReport;

/// Add `source` to the archive as `target_folder/<file name>`.
///
/// An entry already stored at that path is replaced, so repeating the call
/// leaves exactly one entry holding the latest content. Returns the entry path.
pub fn add_file(
    archive: impl AsRef<Path>,
    source: impl AsRef<Path>,
    target_folder: Option<&str>,
    options: &UpdateOptions,
) -> Result<ArchivePath> {
    let source = source.as_ref();
    let entry = entry_path_for(source, target_folder)?;

    let mut handle = UpdateHandle::open(archive.as_ref(), options)?;
    handle.add(entry.clone(), source)?;
    handle.commit()?;
    Ok(entry)
}

/// Remove the first entry matching `query`.
///
/// Returns the removed entry's name. No match is a no-op unless
/// [`MissingEntry::Error`] is set.
pub fn remove_file(
    archive: impl AsRef<Path>,
    query: impl Into<EntryQuery>,
    options: &UpdateOptions,
) -> Result<Option<String>> {
    let query = query.into();
    let mut handle = UpdateHandle::open(archive.as_ref(), options)?;

    let Some(removed) = handle.remove_first(&query) else {
        debug!(archive = %handle.path().display(), %query, "nothing to remove");
        return missing(handle.path(), &query, options.missing_entry).map(|()| None);
    };
    handle.commit()?;
    Ok(Some(removed))
}

/// Replace the entry at `target_folder/<file name>` with `source`.
///
/// Running it twice with the same inputs gives the same archive as running
/// it once. With [`MissingEntry::Error`] the entry must already exist.
pub fn update_file(
    archive: impl AsRef<Path>,
    source: impl AsRef<Path>,
    target_folder: Option<&str>,
    options: &UpdateOptions,
) -> Result<ArchivePath> {
    let source = source.as_ref();
    let entry = entry_path_for(source, target_folder)?;

    let mut handle = UpdateHandle::open(archive.as_ref(), options)?;
    if !handle.occupied(&entry) {
        missing(handle.path(), &EntryQuery::from(&entry), options.missing_entry)?;
    }
    handle.add(entry.clone(), source)?;
    handle.commit()?;
    Ok(entry)
}

/// Add every file below `source_dir`, keeping its layout under `target_folder`.
///
/// Entry paths are `target_folder` plus the file's path relative to
/// `source_dir`. Existing entries at those paths are replaced. The walk stops
/// at the first file that cannot be read, and the archive is then left
/// unchanged.
pub fn add_directory_tree(
    archive: impl AsRef<Path>,
    source_dir: impl AsRef<Path>,
    target_folder: Option<&str>,
    options: &UpdateOptions,
) -> Result<UpdateReport> {
    let source_dir = source_dir.as_ref();
    if !source_dir.is_dir() {
        return Err(Error::SourceNotFound {
            path: source_dir.to_path_buf(),
        });
    }
    let folder = parse_folder(target_folder)?;

    let mut handle = UpdateHandle::open(archive.as_ref(), options)?;
    for entry in WalkDir::new(source_dir)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| walk_error(source_dir, e))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = relative_to_with(source_dir, entry.path(), options.case_sensitivity)?;
        handle.add(relative.in_folder(folder.as_ref()), entry.path())?;
    }

    let report = handle.commit()?;
    debug!(
        source = %source_dir.display(),
        written = report.written.len(),
        "added directory tree"
    );
    Ok(report)
}

fn entry_path_for(source: &Path, target_folder: Option<&str>) -> Result<ArchivePath> {
    let name = source
        .file_name()
        .map(|n| n.to_string_lossy())
        .filter(|n| zipmend_path::is_valid_name(n))
        .ok_or_else(|| zipmend_path::Error::InvalidName(source.display().to_string()))?;
    let folder = parse_folder(target_folder)?;
    Ok(ArchivePath::new(name)?.in_folder(folder.as_ref()))
}

/// An empty or missing folder means the archive root.
fn parse_folder(target_folder: Option<&str>) -> Result<Option<ArchivePath>> {
    match target_folder.map(|f| f.trim_matches(['/', '\\'])) {
        None | Some("") => Ok(None),
        Some(folder) => Ok(Some(ArchivePath::new(folder)?)),
    }
}

pub(crate) fn missing(archive: &Path, query: &EntryQuery, policy: MissingEntry) -> Result<()> {
    match policy {
        MissingEntry::Ignore => Ok(()),
        MissingEntry::Error => Err(Error::EntryNotFound {
            archive: archive.to_path_buf(),
            query: query.to_string(),
        }),
    }
}

fn walk_error(root: &Path, err: walkdir::Error) -> Error {
    let path = err.path().unwrap_or(root).to_path_buf();
    let source = err
        .into_io_error()
        .unwrap_or_else(|| io::Error::other("file system loop"));
    Error::Io { path, source }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_path_without_folder_is_file_name() {
        let entry = entry_path_for(Path::new("/tmp/build/manifest.json"), None).unwrap();
        assert_eq!(entry.as_str(), "manifest.json");
    }

    #[test]
    fn entry_path_with_folder() {
        let entry = entry_path_for(Path::new("manifest.json"), Some("meta")).unwrap();
        assert_eq!(entry.as_str(), "meta/manifest.json");

        let entry = entry_path_for(Path::new("lib.so"), Some("\\lib\\arm64/")).unwrap();
        assert_eq!(entry.as_str(), "lib/arm64/lib.so");
    }

    #[test]
    fn empty_folder_means_root() {
        let entry = entry_path_for(Path::new("a.txt"), Some("")).unwrap();
        assert_eq!(entry.as_str(), "a.txt");
    }

    #[test]
    fn source_without_file_name_rejected() {
        let err = entry_path_for(Path::new("/"), None).unwrap_err();
        assert!(matches!(
            err,
            Error::Path(zipmend_path::Error::InvalidName(_))
        ));
    }

    #[test]
    fn missing_policy() {
        let query = EntryQuery::contains("x");
        assert!(missing(Path::new("a.zip"), &query, MissingEntry::Ignore).is_ok());
        assert!(matches!(
            missing(Path::new("a.zip"), &query, MissingEntry::Error),
            Err(Error::EntryNotFound { .. })
        ));
    }
}
