use std::path::PathBuf;

use zipmend_path::ArchivePath;

/// Outcome of a call that rewrote an archive.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UpdateReport {
    /// Entries written from source files, in write order.
    pub written: Vec<ArchivePath>,
    /// Paths whose previous entry was dropped to make room for a new one.
    pub replaced: Vec<ArchivePath>,
    /// Entries removed by name lookup.
    pub removed: Vec<String>,
}

impl UpdateReport {
    pub fn is_unchanged(&self) -> bool {
        self.written.is_empty() && self.removed.is_empty()
    }
}

#[derive(Clone, Debug, Default)]
pub struct ExtractReport {
    pub entries: Vec<ExtractedEntry>,
    pub total_bytes: u64,
}

impl ExtractReport {
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn push(&mut self, entry: ExtractedEntry) {
        self.total_bytes += entry.size;
        self.entries.push(entry);
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractedEntry {
    /// Entry name as stored in the archive.
    pub name: String,
    pub target_path: PathBuf,
    pub size: u64,
    pub is_directory: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_report_totals() {
        let mut report = ExtractReport::default();
        report.push(ExtractedEntry {
            name: "a/x.txt".into(),
            target_path: PathBuf::from("/out/a/x.txt"),
            size: 10,
            is_directory: false,
        });
        report.push(ExtractedEntry {
            name: "a/".into(),
            target_path: PathBuf::from("/out/a"),
            size: 0,
            is_directory: true,
        });
        assert_eq!(report.entry_count(), 2);
        assert_eq!(report.total_bytes, 10);
    }

    #[test]
    fn update_report_unchanged() {
        let mut report = UpdateReport::default();
        assert!(report.is_unchanged());
        report.removed.push("old.txt".into());
        assert!(!report.is_unchanged());
    }
}
