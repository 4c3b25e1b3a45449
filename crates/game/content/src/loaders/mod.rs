//! Content loaders for reading combat data from files.
//!
//! Every loader has an embedded default (compiled in with `include_str!`) and
//! a path-based variant for content packs on disk.

pub mod actions;
pub mod tables;

pub use actions::{ActionBook, ActionSpec};
pub use tables::TablesLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
