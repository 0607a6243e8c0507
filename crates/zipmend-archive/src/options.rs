use std::fs::Metadata;
use std::sync::Arc;

use zip::CompressionMethod;
use zip::write::SimpleFileOptions;
use zipmend_path::CaseSensitivity;

/// Entries at or above this size are written with ZIP64 headers.
const LARGE_FILE_THRESHOLD: u64 = u32::MAX as u64;

/// How new entries are stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Compression {
    #[default]
    Deflated,
    Stored,
}

/// What a lookup that matches nothing does.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MissingEntry {
    /// Treat it as a no-op.
    #[default]
    Ignore,
    /// Fail with `Error::EntryNotFound`.
    Error,
}

/// Options for add, update and remove operations.
#[derive(Clone, Debug, Default)]
pub struct UpdateOptions {
    pub compression: Compression,
    pub compression_level: Option<i64>,
    pub case_sensitivity: CaseSensitivity,
    pub missing_entry: MissingEntry,
}

impl UpdateOptions {
    pub fn compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    pub fn compression_level(mut self, level: i64) -> Self {
        self.compression_level = Some(level);
        self
    }

    /// Case policy used when computing entry paths relative to a source directory.
    pub fn case_sensitivity(mut self, case: CaseSensitivity) -> Self {
        self.case_sensitivity = case;
        self
    }

    pub fn missing_entry(mut self, policy: MissingEntry) -> Self {
        self.missing_entry = policy;
        self
    }

    pub(crate) fn file_options(&self, source: &Metadata) -> SimpleFileOptions {
        let method = match self.compression {
            Compression::Deflated => CompressionMethod::Deflated,
            Compression::Stored => CompressionMethod::Stored,
        };
        let level = match self.compression {
            Compression::Deflated => self.compression_level,
            Compression::Stored => None,
        };

        let options = SimpleFileOptions::default()
            .compression_method(method)
            .compression_level(level)
            .large_file(source.len() >= LARGE_FILE_THRESHOLD);

        #[cfg(unix)]
        let options = {
            use std::os::unix::fs::PermissionsExt;
            options.unix_permissions(source.permissions().mode() & 0o7777)
        };

        options
    }
}

/// Progress of a multi-entry extraction, reported after each entry.
#[derive(Clone, Debug)]
pub struct Progress {
    pub entries_processed: usize,
    pub total_entries: usize,
    pub bytes_written: u64,
    pub current: String,
}

impl Progress {
    pub fn percentage(&self) -> f32 {
        if self.total_entries == 0 {
            100.0
        } else {
            (self.entries_processed as f32 / self.total_entries as f32) * 100.0
        }
    }
}

/// Options for extraction operations.
#[derive(Clone, Default)]
pub struct ExtractOptions {
    /// Write every entry directly into the destination under its base name.
    ///
    /// Entries sharing a base name overwrite each other; the one extracted
    /// last wins.
    pub flatten: bool,
    pub missing_entry: MissingEntry,
    pub on_progress: Option<Arc<dyn Fn(Progress) + Send + Sync>>,
}

impl ExtractOptions {
    pub fn flatten(mut self, flatten: bool) -> Self {
        self.flatten = flatten;
        self
    }

    pub fn missing_entry(mut self, policy: MissingEntry) -> Self {
        self.missing_entry = policy;
        self
    }

    pub fn on_progress(mut self, callback: Arc<dyn Fn(Progress) + Send + Sync>) -> Self {
        self.on_progress = Some(callback);
        self
    }
}
