//! File system primitives for rewriting archives in place.
//!
//! - [`StagedFile`] - temporary sibling that atomically replaces its target
//! - [`write_file`] / [`ensure_dir`] - streamed writes with parent creation

mod error;
mod primitives;

pub use error::{Error, Result};
pub use primitives::{StagedFile, ensure_dir, write_file};

#[derive(Clone, Copy, Debug)]
pub struct StageOptions {
    prefix: &'static str,
    suffix: &'static str,
    sync:   bool,
}

impl Default for StageOptions {
    fn default() -> Self { Self::new() }
}

impl StageOptions {
    pub fn new() -> Self {
        Self {
            prefix: ".",
            suffix: ".tmp",
            sync:   true,
        }
    }

    pub fn prefix(mut self, prefix: &'static str) -> Self {
        self.prefix = prefix;
        self
    }

    pub fn suffix(mut self, suffix: &'static str) -> Self {
        self.suffix = suffix;
        self
    }

    /// Flush the staged file to disk before it replaces the target.
    pub fn sync(mut self, sync: bool) -> Self {
        self.sync = sync;
        self
    }

    pub fn prefix_str(&self) -> &'static str { self.prefix }

    pub fn suffix_str(&self) -> &'static str { self.suffix }

    pub fn sync_enabled(&self) -> bool { self.sync }
}
