//! In-place mutation of ZIP archives.
//!
//! # Architecture
//!
//! - `handle.rs` - Scoped read and update bindings to one archive
//! - `query.rs` - Entry predicates and lookup results
//! - `lookup.rs` - Read-only queries
//! - `update.rs` - Add, replace and remove entries
//! - `extract.rs` - Write entries to the file system
//! - `options.rs` / `report.rs` - Call configuration and outcomes
//!
//! Every update rebuilds the archive into a sibling temporary file and swaps
//! it in once all edits of the call succeeded.
//!
//! ```no_run
//! use zipmend_archive::{UpdateOptions, add_file, exists, remove_file};
//!
//! # fn main() -> zipmend_archive::Result<()> {
//! let options = UpdateOptions::default();
//! let entry = add_file("app.zip", "build/manifest.json", Some("meta"), &options)?;
//! assert_eq!(entry.as_str(), "meta/manifest.json");
//!
//! remove_file("app.zip", &entry, &options)?;
//! assert!(!exists("app.zip", &entry)?);
//! # Ok(())
//! # }
//! ```

pub use error::{Error, ErrorKind, Result};
pub use extract::{extract_all, extract_directory, extract_file};
pub use lookup::{create_archive, exists, find_entry, list_entries};
pub use options::{Compression, ExtractOptions, MissingEntry, Progress, UpdateOptions};
pub use query::{EntryMatch, EntryQuery, MatchMode};
pub use report::{ExtractReport, ExtractedEntry, UpdateReport};
pub use update::{add_directory_tree, add_file, remove_file, update_file};
pub use zipmend_path::{ArchivePath, CaseSensitivity};

mod error;
mod extract;
mod handle;
mod lookup;
mod options;
mod query;
mod report;
mod update;
