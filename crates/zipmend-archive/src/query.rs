//! Entry lookup predicates and their results.

use std::fmt;

use zipmend_path::ArchivePath;

/// How the name part of an [`EntryQuery`] is compared with entry paths.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// The full entry path contains the name anywhere.
    #[default]
    Contains,
    /// The full entry path equals the name.
    Exact,
}

/// Predicate selecting entries by their full path.
///
/// Lookups scan entries in archive order and the first match wins. A
/// `contains` query for `"lib"` matches `lib/`, `liblog.so` and `mylib/foo`
/// alike; use [`EntryQuery::exact`] when that is not wanted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryQuery {
    name: String,
    folder: Option<String>,
    mode: MatchMode,
}

impl EntryQuery {
    pub fn contains(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            folder: None,
            mode: MatchMode::Contains,
        }
    }

    pub fn exact(path: impl Into<String>) -> Self {
        Self {
            name: path.into(),
            folder: None,
            mode: MatchMode::Exact,
        }
    }

    /// Additionally require the entry to sit in `folder`.
    ///
    /// For `contains` queries the folder is another substring test; for exact
    /// queries the entry must lie below `folder/`. An empty folder adds no
    /// constraint.
    pub fn in_folder(mut self, folder: impl Into<String>) -> Self {
        let folder = folder.into();
        self.folder = (!folder.is_empty()).then_some(folder);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn folder(&self) -> Option<&str> {
        self.folder.as_deref()
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn matches(&self, entry_name: &str) -> bool {
        match self.mode {
            MatchMode::Contains => {
                entry_name.contains(&self.name)
                    && self
                        .folder
                        .as_deref()
                        .is_none_or(|folder| entry_name.contains(folder))
            }
            MatchMode::Exact => {
                entry_name == self.name
                    && self.folder.as_deref().is_none_or(|folder| {
                        let folder = folder.trim_end_matches('/');
                        entry_name
                            .strip_prefix(folder)
                            .is_some_and(|rest| rest.starts_with('/'))
                    })
            }
        }
    }
}

impl From<&str> for EntryQuery {
    fn from(name: &str) -> Self {
        Self::contains(name)
    }
}

impl From<String> for EntryQuery {
    fn from(name: String) -> Self {
        Self::contains(name)
    }
}

impl From<&ArchivePath> for EntryQuery {
    fn from(path: &ArchivePath) -> Self {
        Self::exact(path.as_str())
    }
}

impl fmt::Display for EntryQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            MatchMode::Contains => write!(f, "name containing '{}'", self.name)?,
            MatchMode::Exact => write!(f, "path '{}'", self.name)?,
        }
        if let Some(folder) = &self.folder {
            write!(f, " in folder '{folder}'")?;
        }
        Ok(())
    }
}

/// An entry found by a lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryMatch {
    /// Position in archive enumeration order.
    pub index: usize,
    /// Full entry path as stored in the archive.
    pub name: String,
    pub size: u64,
    pub compressed_size: u64,
    pub is_dir: bool,
}

impl EntryMatch {
    /// Last path segment of the entry.
    pub fn file_name(&self) -> &str {
        entry_file_name(&self.name)
    }

    /// [`EntryMatch::file_name`] without its final extension.
    pub fn file_stem(&self) -> &str {
        let name = self.file_name();
        match name.rfind('.') {
            Some(0) | None => name,
            Some(idx) => &name[..idx],
        }
    }
}

/// Last segment of a raw entry name, tolerating `\` separators and a trailing `/`.
pub(crate) fn entry_file_name(name: &str) -> &str {
    let trimmed = name.trim_end_matches(['/', '\\']);
    trimmed.rsplit(['/', '\\']).next().unwrap_or(trimmed)
}

pub(crate) fn is_dir_name(name: &str) -> bool {
    name.ends_with('/') || name.ends_with('\\')
}
