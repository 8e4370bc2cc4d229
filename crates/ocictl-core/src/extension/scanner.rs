//! Filesystem discovery of extension artifacts.

use std::path::Path;

use walkdir::WalkDir;

use super::{loader, Extension, ExtensionError, Result};

/// Artifacts must carry this file name prefix to be considered candidates.
pub const EXTENSION_PREFIX: &str = "oci-";

/// Walk the tree rooted at `root` and load every matching artifact.
///
/// Only regular files whose base name starts with [`EXTENSION_PREFIX`] are
/// handed to the loader; directories and other files are skipped silently.
/// Discovery is all-or-nothing: the first walk or load error aborts the
/// scan and partial results are discarded. A tree without matching
/// artifacts is not an error.
pub fn scan(root: &Path) -> Result<Vec<Box<dyn Extension>>> {
    let mut extensions: Vec<Box<dyn Extension>> = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry =
            entry.map_err(|e| ExtensionError::Discovery(format!("{}: {e}", root.display())))?;

        if !entry.file_type().is_file() {
            continue;
        }

        let is_candidate = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with(EXTENSION_PREFIX));
        if !is_candidate {
            continue;
        }

        extensions.push(loader::load(entry.path())?);
    }

    tracing::debug!(count = extensions.len(), root = %root.display(), "extension scan complete");
    Ok(extensions)
}
