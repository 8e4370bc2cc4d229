//! Registry of loaded extensions.

use std::path::Path;

use super::{scanner, Extension, Result};

/// Owns the set of loaded extensions for one process run.
///
/// Created empty at process entry, populated by [`scan`](Self::scan) during
/// initialization and read-only afterwards; there is no removal or unload
/// path. The manager is an explicit object passed by reference, never
/// ambient global state.
#[derive(Default)]
pub struct ExtensionManager {
    extensions: Vec<Box<dyn Extension>>,
    dry_run: bool,
}

impl ExtensionManager {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan `dir` and register every discovered extension.
    ///
    /// Discovery order is kept. A discovered extension whose name is
    /// already registered replaces the earlier entry in place, so
    /// re-scanning a directory refreshes the registry instead of
    /// accumulating duplicates.
    pub fn scan(&mut self, dir: &Path) -> Result<()> {
        for extension in scanner::scan(dir)? {
            self.register(extension);
        }
        Ok(())
    }

    /// Register one extension, replacing any earlier entry with the same
    /// name at its original position.
    pub fn register(&mut self, extension: Box<dyn Extension>) {
        match self
            .extensions
            .iter()
            .position(|existing| existing.name() == extension.name())
        {
            Some(index) => {
                tracing::debug!(name = extension.name(), "replacing registered extension");
                self.extensions[index] = extension;
            }
            None => self.extensions.push(extension),
        }
    }

    /// All registered extensions in discovery order.
    pub fn list_extensions(&self) -> &[Box<dyn Extension>] {
        &self.extensions
    }

    /// Look up an extension by name.
    pub fn get(&self, name: &str) -> Option<&dyn Extension> {
        self.extensions
            .iter()
            .find(|e| e.name() == name)
            .map(AsRef::as_ref)
    }

    /// Whether an extension with the given name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of registered extensions.
    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// Turn on advisory dry-run mode.
    ///
    /// Extensions see the flag through their run context; the manager never
    /// intercepts or blocks execution, and the registry contents are
    /// untouched.
    pub fn enable_dry_run_mode(&mut self) {
        self.dry_run = true;
    }

    /// Whether dry-run mode is on.
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }
}
