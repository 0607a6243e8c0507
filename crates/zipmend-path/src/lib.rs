//! Path helpers for archive entry naming.
//!
//! Everything here is lexical. The only file system access is reading the
//! current directory when a relative path has to be made absolute.
//!
//! ```
//! use zipmend_path::{ArchivePath, relative_to};
//!
//! let entry = relative_to("/work/app", "/work/app/res/values/strings.xml").unwrap();
//! assert_eq!(entry.as_str(), "res/values/strings.xml");
//!
//! let folder = ArchivePath::new("assets\\bin").unwrap();
//! assert_eq!(folder.join(&entry).as_str(), "assets/bin/res/values/strings.xml");
//! ```

pub use archive_path::ArchivePath;
pub use error::{Error, Result};
pub use resolve::{
    CaseSensitivity, absolutize, is_valid_name, relative_to, relative_to_with, without_extension,
};

mod archive_path;
mod error;
mod resolve;
