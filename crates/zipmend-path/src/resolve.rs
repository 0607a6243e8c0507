//! Name validation and base-relative path computation.

use std::borrow::Cow;
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use crate::archive_path::ArchivePath;
use crate::error::{Error, Result};

/// Characters Windows refuses in a file name.
const WINDOWS_RESERVED_CHARS: &[char] = &['<', '>', ':', '"', '|', '?', '*'];

/// How path components are compared when testing containment.
///
/// The default is [`CaseSensitivity::Insensitive`], matching case-insensitive
/// file systems. Use [`CaseSensitivity::native`] to follow the host instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CaseSensitivity {
    Sensitive,
    #[default]
    Insensitive,
}

impl CaseSensitivity {
    /// Usual policy of the host operating system.
    pub fn native() -> Self {
        if cfg!(any(windows, target_os = "macos")) {
            Self::Insensitive
        } else {
            Self::Sensitive
        }
    }

    fn same_component(self, a: &OsStr, b: &OsStr) -> bool {
        match self {
            Self::Sensitive => a == b,
            Self::Insensitive => {
                a == b || a.to_string_lossy().to_lowercase() == b.to_string_lossy().to_lowercase()
            }
        }
    }
}

/// Whether `candidate` can be used as a file name on this host.
///
/// Empty strings, strings with NUL bytes and strings without a final name
/// component (`"/"`, `"."`, `"a/.."`) are rejected.
pub fn is_valid_name(candidate: &str) -> bool {
    if candidate.is_empty() || candidate.contains('\0') {
        return false;
    }
    let Some(name) = Path::new(candidate).file_name() else {
        return false;
    };
    if cfg!(windows) {
        let name = name.to_string_lossy();
        if name
            .chars()
            .any(|c| c.is_control() || WINDOWS_RESERVED_CHARS.contains(&c))
        {
            return false;
        }
    }
    true
}

/// `path` with the final extension removed from its file name, kept in the same directory.
pub fn without_extension(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    let parent = path.parent().ok_or_else(|| Error::NoParent {
        path: path.to_path_buf(),
    })?;
    let stem = path
        .file_stem()
        .ok_or_else(|| Error::InvalidName(path.display().to_string()))?;
    Ok(parent.join(stem))
}

/// Absolute, lexically normalized form of `path`.
///
/// Relative paths are joined onto the current directory. `.` and `..` are
/// resolved without touching the file system, so symlinks are not followed.
pub fn absolutize(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    let joined: Cow<'_, Path> = if path.is_absolute() {
        Cow::Borrowed(path)
    } else {
        let cwd = std::env::current_dir().map_err(|source| Error::CurrentDir { source })?;
        Cow::Owned(cwd.join(path))
    };
    Ok(normalize(&joined))
}

/// Entry path of `full` relative to `base`, comparing case-insensitively.
pub fn relative_to(base: impl AsRef<Path>, full: impl AsRef<Path>) -> Result<ArchivePath> {
    relative_to_with(base, full, CaseSensitivity::default())
}

/// Entry path of `full` relative to `base`.
///
/// Both paths are made absolute first, then `base` must be a strict
/// component-wise prefix of `full`. Anything else, including `full == base`,
/// is a [`Error::Containment`].
pub fn relative_to_with(
    base: impl AsRef<Path>,
    full: impl AsRef<Path>,
    case: CaseSensitivity,
) -> Result<ArchivePath> {
    let base = absolutize(base)?;
    let full = absolutize(full)?;

    match strip_base(&base, &full, case) {
        Some(segments) if !segments.is_empty() => ArchivePath::from_segments(segments),
        _ => Err(Error::Containment { base, path: full }),
    }
}

fn strip_base(base: &Path, full: &Path, case: CaseSensitivity) -> Option<Vec<String>> {
    let mut remaining = full.components();
    for expected in base.components() {
        let actual = remaining.next()?;
        if !case.same_component(expected.as_os_str(), actual.as_os_str()) {
            return None;
        }
    }
    Some(
        remaining
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect(),
    )
}

fn normalize(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                result.pop();
            }
            Component::CurDir => {}
            other => result.push(other.as_os_str()),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> &'static Path {
        if cfg!(windows) {
            Path::new("C:/work/app")
        } else {
            Path::new("/work/app")
        }
    }

    #[test]
    fn valid_names() {
        assert!(is_valid_name("classes.dex"));
        assert!(is_valid_name("res/values/strings.xml"));
        assert!(is_valid_name(".hidden"));
    }

    #[test]
    fn invalid_names() {
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("/"));
        assert!(!is_valid_name("///"));
        assert!(!is_valid_name("."));
        assert!(!is_valid_name(".."));
        assert!(!is_valid_name("a/.."));
        assert!(!is_valid_name("bad\0name"));
    }

    #[cfg(windows)]
    #[test]
    fn windows_reserved_characters() {
        assert!(!is_valid_name("what?.txt"));
        assert!(!is_valid_name("a|b"));
    }

    #[test]
    fn without_extension_keeps_directory() {
        let path = base().join("dist/app-release.apk");
        assert_eq!(without_extension(&path).unwrap(), base().join("dist/app-release"));
        assert_eq!(without_extension("notes.txt").unwrap(), PathBuf::from("notes"));
        assert_eq!(
            without_extension("archive.tar.gz").unwrap(),
            PathBuf::from("archive.tar")
        );
    }

    #[test]
    fn without_extension_needs_parent() {
        let root = if cfg!(windows) { "C:\\" } else { "/" };
        assert!(matches!(without_extension(root), Err(Error::NoParent { .. })));
        assert!(matches!(without_extension(""), Err(Error::NoParent { .. })));
    }

    #[test]
    fn absolutize_resolves_dots() {
        let path = base().join("./res/../lib/./arm64");
        assert_eq!(absolutize(&path).unwrap(), base().join("lib/arm64"));
    }

    #[test]
    fn absolutize_relative_uses_current_dir() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(absolutize("a/b/..").unwrap(), cwd.join("a"));
    }

    #[test]
    fn relative_path_uses_forward_slashes() {
        let full = base().join("res").join("values").join("strings.xml");
        let relative = relative_to(base(), &full).unwrap();
        assert_eq!(relative.as_str(), "res/values/strings.xml");
    }

    #[test]
    fn relative_path_ignores_case_by_default() {
        let full = if cfg!(windows) {
            Path::new("C:/WORK/App/smali/Main.smali")
        } else {
            Path::new("/WORK/App/smali/Main.smali")
        };
        assert_eq!(relative_to(base(), full).unwrap().as_str(), "smali/Main.smali");
        assert!(matches!(
            relative_to_with(base(), full, CaseSensitivity::Sensitive),
            Err(Error::Containment { .. })
        ));
    }

    #[test]
    fn sibling_with_common_prefix_is_not_contained() {
        let sibling = base().with_file_name("app-other").join("file.txt");
        assert!(matches!(
            relative_to(base(), &sibling),
            Err(Error::Containment { .. })
        ));
    }

    #[test]
    fn parent_escape_is_not_contained() {
        let escaped = base().join("../secrets/key.pem");
        assert!(matches!(
            relative_to(base(), &escaped),
            Err(Error::Containment { .. })
        ));
    }

    #[test]
    fn base_itself_is_not_contained() {
        assert!(matches!(
            relative_to(base(), base()),
            Err(Error::Containment { .. })
        ));
    }

    #[test]
    fn trailing_separator_on_base() {
        let base_with_slash = format!("{}/", base().display());
        let relative = relative_to(&base_with_slash, base().join("AndroidManifest.xml")).unwrap();
        assert_eq!(relative.as_str(), "AndroidManifest.xml");
    }
}
