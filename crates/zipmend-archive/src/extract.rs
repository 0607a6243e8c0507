//! Writing archive entries out to the file system.
//!
//! Entry contents always overwrite whatever is at the destination. Without
//! `flatten`, entry paths are resolved with the zip crate's `enclosed_name`
//! and any entry that would escape the destination fails the call with
//! [`Error::UnsafeEntry`].

use std::path::{Path, PathBuf};

use tracing::{debug, trace};
use zipmend_fs::{ensure_dir, write_file};

use crate::error::{Error, Result};
use crate::handle::ReadHandle;
use crate::options::ExtractOptions;
use crate::options::Progress;
use crate::query::{EntryQuery, entry_file_name, is_dir_name};
use crate::report::{ExtractReport, ExtractedEntry};
use crate::update::missing;

/// Extract the first file entry matching `query` to `destination/<base name>`.
///
/// Directory entries are never selected. Returns the written path, or `None`
/// when nothing matched and [`MissingEntry::Ignore`](crate::MissingEntry) is
/// in effect.
pub fn extract_file(
    archive: impl AsRef<Path>,
    query: impl Into<EntryQuery>,
    destination: impl AsRef<Path>,
    options: &ExtractOptions,
) -> Result<Option<PathBuf>> {
    let query = query.into();
    let destination = destination.as_ref();
    let mut handle = ReadHandle::open(archive.as_ref())?;

    let Some(index) = handle.position(|name| !is_dir_name(name) && query.matches(name)) else {
        debug!(archive = %handle.path().display(), %query, "no entry to extract");
        return missing(handle.path(), &query, options.missing_entry).map(|()| None);
    };

    let entry = handle.by_index(index)?;
    let name = entry.name().to_string();
    let base = entry_file_name(&name);
    if !zipmend_path::is_valid_name(base) {
        return Err(Error::UnsafeEntry { entry: name });
    }

    let target = destination.join(base);
    ensure_dir(destination)?;
    let bytes = write_file(&target, entry)?;
    debug!(
        archive = %handle.path().display(),
        entry = %name,
        target = %target.display(),
        bytes,
        "extracted entry"
    );
    Ok(Some(target))
}

/// Extract every entry below `destination`.
pub fn extract_all(
    archive: impl AsRef<Path>,
    destination: impl AsRef<Path>,
    options: &ExtractOptions,
) -> Result<ExtractReport> {
    let mut handle = ReadHandle::open(archive.as_ref())?;
    let selected = handle.positions(|_| true);
    extract_selected(&mut handle, &selected, destination.as_ref(), options)
}

/// Extract every entry matching `folder`.
///
/// A plain string selects entries whose full path contains it, which is not
/// necessarily a leading directory.
pub fn extract_directory(
    archive: impl AsRef<Path>,
    folder: impl Into<EntryQuery>,
    destination: impl AsRef<Path>,
    options: &ExtractOptions,
) -> Result<ExtractReport> {
    let query = folder.into();
    let mut handle = ReadHandle::open(archive.as_ref())?;
    let selected = handle.positions(|name| query.matches(name));
    if selected.is_empty() {
        missing(handle.path(), &query, options.missing_entry)?;
    }
    extract_selected(&mut handle, &selected, destination.as_ref(), options)
}

fn extract_selected(
    handle: &mut ReadHandle,
    selected: &[usize],
    destination: &Path,
    options: &ExtractOptions,
) -> Result<ExtractReport> {
    ensure_dir(destination)?;

    // Directory entries are not written when flattening.
    let selected: Vec<usize> = if options.flatten {
        selected
            .iter()
            .copied()
            .filter(|&i| !handle.name(i).is_some_and(is_dir_name))
            .collect()
    } else {
        selected.to_vec()
    };

    let mut report = ExtractReport::default();
    for (done, &index) in selected.iter().enumerate() {
        let entry = handle.by_index(index)?;
        let name = entry.name().to_string();
        let is_directory = entry.is_dir();

        let target = if options.flatten {
            let base = entry_file_name(&name);
            if !zipmend_path::is_valid_name(base) {
                return Err(Error::UnsafeEntry { entry: name });
            }
            destination.join(base)
        } else {
            match entry.enclosed_name() {
                Some(relative) => destination.join(relative),
                None => return Err(Error::UnsafeEntry { entry: name }),
            }
        };

        let size = if is_directory {
            ensure_dir(&target)?;
            0
        } else {
            write_file(&target, entry)?
        };
        trace!(entry = %name, target = %target.display(), size, "extracted entry");

        report.push(ExtractedEntry {
            name,
            target_path: target,
            size,
            is_directory,
        });

        if let Some(callback) = &options.on_progress {
            callback(Progress {
                entries_processed: done + 1,
                total_entries: selected.len(),
                bytes_written: report.total_bytes,
                current: report.entries.last().map(|e| e.name.clone()).unwrap_or_default(),
            });
        }
    }

    debug!(
        archive = %handle.path().display(),
        destination = %destination.display(),
        entries = report.entry_count(),
        bytes = report.total_bytes,
        flatten = options.flatten,
        "extracted entries"
    );
    Ok(report)
}
