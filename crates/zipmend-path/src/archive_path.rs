use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Location of an entry inside a ZIP container.
///
/// Always `/`-separated, never absolute, never empty, and free of `.` and
/// `..` segments. Two `ArchivePath`s are equal exactly when they name the
/// same entry.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArchivePath(String);

impl ArchivePath {
    /// Normalize `raw` into an entry path.
    ///
    /// Backslashes become `/`, empty and `.` segments are dropped. Fails on
    /// NUL bytes, `..` segments, or when nothing is left.
    pub fn new(raw: impl AsRef<str>) -> Result<Self> {
        let raw = raw.as_ref();
        Self::build(raw, raw.split(['/', '\\']))
    }

    /// Build a path from already split segments, validating each one.
    pub fn from_segments<I, S>(segments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let segments: Vec<S> = segments.into_iter().collect();
        let raw = segments
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join("/");
        Self::build(&raw, segments.iter().flat_map(|s| s.as_ref().split(['/', '\\'])))
    }

    fn build<'a>(raw: &str, segments: impl Iterator<Item = &'a str>) -> Result<Self> {
        let invalid = |reason| Error::InvalidArchivePath {
            path: raw.to_string(),
            reason,
        };

        if raw.contains('\0') {
            return Err(invalid("contains NUL byte"));
        }

        let mut normalized = String::with_capacity(raw.len());
        for segment in segments {
            match segment {
                "" | "." => continue,
                ".." => return Err(invalid("'..' segment not allowed")),
                _ => {}
            }
            if !normalized.is_empty() {
                normalized.push('/');
            }
            normalized.push_str(segment);
        }

        if normalized.is_empty() {
            return Err(invalid("empty path"));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Append `other` below this path.
    pub fn join(&self, other: &ArchivePath) -> ArchivePath {
        Self(format!("{}/{}", self.0, other.0))
    }

    /// Place this path under `folder`, or return it unchanged when there is no folder.
    pub fn in_folder(self, folder: Option<&ArchivePath>) -> ArchivePath {
        match folder {
            Some(folder) => folder.join(&self),
            None => self,
        }
    }

    /// Parent path, `None` for a single segment.
    pub fn parent(&self) -> Option<&str> {
        self.0.rfind('/').map(|idx| &self.0[..idx])
    }

    /// Last segment.
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Last segment without its final extension. Leading dots do not start an extension.
    pub fn file_stem(&self) -> &str {
        let name = self.file_name();
        match name.rfind('.') {
            Some(0) | None => name,
            Some(idx) => &name[..idx],
        }
    }
}

impl fmt::Display for ArchivePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ArchivePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for ArchivePath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl From<ArchivePath> for String {
    fn from(path: ArchivePath) -> Self {
        path.0
    }
}
