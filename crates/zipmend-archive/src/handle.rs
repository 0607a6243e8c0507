//! Scoped bindings to an open archive.
//!
//! A handle lives for exactly one public operation. [`ReadHandle`] wraps a
//! read-only `ZipArchive`. [`UpdateHandle`] queues removals and additions
//! against it and applies them in [`UpdateHandle::commit`] by rebuilding the
//! container next to the original and swapping it in. Dropping an update
//! handle without committing leaves the archive untouched.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use tracing::{debug, trace};
use zip::{ZipArchive, ZipWriter};
use zipmend_fs::{StageOptions, StagedFile};
use zipmend_path::ArchivePath;

use crate::error::{Error, Result};
use crate::options::UpdateOptions;
use crate::query::{EntryMatch, EntryQuery};
use crate::report::UpdateReport;

pub(crate) struct ReadHandle {
    path: PathBuf,
    archive: ZipArchive<BufReader<File>>,
}

impl ReadHandle {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::ArchiveNotFound {
                path: path.to_path_buf(),
            },
            _ => Error::io(path, e),
        })?;
        let archive = ZipArchive::new(BufReader::new(file)).map_err(|e| Error::zip(path, e))?;
        Ok(Self {
            path: path.to_path_buf(),
            archive,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.archive.len()
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.archive.name_for_index(index)
    }

    /// Index of the first entry, in archive order, whose name satisfies `pred`.
    pub fn position(&self, mut pred: impl FnMut(&str) -> bool) -> Option<usize> {
        (0..self.len()).find(|&i| self.name(i).is_some_and(&mut pred))
    }

    /// Indices of all entries whose name satisfies `pred`, in archive order.
    pub fn positions(&self, mut pred: impl FnMut(&str) -> bool) -> Vec<usize> {
        (0..self.len())
            .filter(|&i| self.name(i).is_some_and(&mut pred))
            .collect()
    }

    pub fn describe(&mut self, index: usize) -> Result<EntryMatch> {
        let file = self
            .archive
            .by_index_raw(index)
            .map_err(|e| Error::zip(&self.path, e))?;
        Ok(EntryMatch {
            index,
            name: file.name().to_string(),
            size: file.size(),
            compressed_size: file.compressed_size(),
            is_dir: file.is_dir(),
        })
    }

    pub fn find(&mut self, query: &EntryQuery) -> Result<Option<EntryMatch>> {
        match self.position(|name| query.matches(name)) {
            Some(index) => self.describe(index).map(Some),
            None => Ok(None),
        }
    }

    /// Decompressing reader for one entry.
    pub fn by_index(&mut self, index: usize) -> Result<zip::read::ZipFile<'_, BufReader<File>>> {
        self.archive
            .by_index(index)
            .map_err(|e| Error::zip(&self.path, e))
    }
}

struct Addition {
    path: ArchivePath,
    source: PathBuf,
}

pub(crate) struct UpdateHandle<'o> {
    source: ReadHandle,
    options: &'o UpdateOptions,
    removed: BTreeSet<usize>,
    additions: Vec<Addition>,
    report: UpdateReport,
}

impl<'o> UpdateHandle<'o> {
    pub fn open(path: &Path, options: &'o UpdateOptions) -> Result<Self> {
        Ok(Self {
            source: ReadHandle::open(path)?,
            options,
            removed: BTreeSet::new(),
            additions: Vec::new(),
            report: UpdateReport::default(),
        })
    }

    pub fn path(&self) -> &Path {
        self.source.path()
    }

    /// Whether an entry is stored at exactly `path`, counting pending edits.
    pub fn occupied(&self, path: &ArchivePath) -> bool {
        let stored = (0..self.source.len())
            .any(|i| !self.removed.contains(&i) && self.source.name(i) == Some(path.as_str()));
        stored || self.additions.iter().any(|a| a.path == *path)
    }

    /// Queue `source` to be written at `path`, replacing anything already there.
    pub fn add(&mut self, path: ArchivePath, source: &Path) -> Result<()> {
        let metadata = std::fs::metadata(source).map_err(|e| Error::io(source, e))?;
        if !metadata.is_file() {
            return Err(Error::io(
                source,
                io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
            ));
        }

        if self.vacate(&path) {
            self.report.replaced.push(path.clone());
        }
        trace!(archive = %self.path().display(), entry = %path, source = %source.display(), "queued entry");
        self.additions.push(Addition {
            path,
            source: source.to_path_buf(),
        });
        Ok(())
    }

    /// Queue removal of the first remaining entry matching `query`.
    pub fn remove_first(&mut self, query: &EntryQuery) -> Option<String> {
        let index = (0..self.source.len()).find(|i| {
            !self.removed.contains(i) && self.source.name(*i).is_some_and(|n| query.matches(n))
        })?;
        self.removed.insert(index);
        let name = self.source.name(index)?.to_string();
        self.report.removed.push(name.clone());
        Some(name)
    }

    /// Drop every stored entry and pending addition at exactly `path`.
    fn vacate(&mut self, path: &ArchivePath) -> bool {
        let mut vacated = false;
        for index in 0..self.source.len() {
            if self.source.name(index) == Some(path.as_str()) && self.removed.insert(index) {
                vacated = true;
            }
        }
        let pending = self.additions.len();
        self.additions.retain(|a| a.path != *path);
        vacated || self.additions.len() != pending
    }

    /// Rebuild the archive with the queued edits and replace the original.
    ///
    /// Nothing is written when no edit was queued.
    pub fn commit(self) -> Result<UpdateReport> {
        let Self {
            mut source,
            options,
            removed,
            additions,
            mut report,
        } = self;

        if removed.is_empty() && additions.is_empty() {
            debug!(archive = %source.path().display(), "no changes to write");
            return Ok(report);
        }

        let archive_path = source.path().to_path_buf();
        let staged = StagedFile::beside(&archive_path, StageOptions::new())?;
        let mut writer = ZipWriter::new(staged);

        for index in 0..source.len() {
            if removed.contains(&index) {
                continue;
            }
            let file = source
                .archive
                .by_index_raw(index)
                .map_err(|e| Error::zip(&archive_path, e))?;
            trace!(entry = %file.name(), "copying entry");
            writer
                .raw_copy_file(file)
                .map_err(|e| Error::zip(&archive_path, e))?;
        }

        for addition in additions {
            let mut input = File::open(&addition.source).map_err(|e| Error::io(&addition.source, e))?;
            let metadata = input
                .metadata()
                .map_err(|e| Error::io(&addition.source, e))?;
            writer
                .start_file(addition.path.as_str(), options.file_options(&metadata))
                .map_err(|e| Error::zip(&archive_path, e))?;
            io::copy(&mut input, &mut writer).map_err(|e| Error::io(&addition.source, e))?;
            trace!(entry = %addition.path, bytes = metadata.len(), "wrote entry");
            report.written.push(addition.path);
        }

        let staged = writer.finish().map_err(|e| Error::zip(&archive_path, e))?;
        drop(source);
        staged.commit()?;

        debug!(
            archive = %archive_path.display(),
            written = report.written.len(),
            replaced = report.replaced.len(),
            removed = report.removed.len(),
            "archive updated"
        );
        Ok(report)
    }
}
