pub mod staged;
pub mod write;

pub use staged::StagedFile;
pub use write::{ensure_dir, write_file};
