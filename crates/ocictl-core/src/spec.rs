//! The versioned configuration document backing CLI behavior.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// The single supported schema version.
pub const SPEC_VERSION: u32 = 1;

/// Default working folder, created under the user's home directory.
pub const DEFAULT_FOLDER: &str = ".ocictl";

/// Default configuration file name, a dotfile in the home directory.
pub const DEFAULT_FILENAME: &str = ".ocictl.yml";

/// Result type for spec operations.
pub type Result<T> = std::result::Result<T, SpecError>;

/// Spec error types.
#[derive(Debug, thiserror::Error)]
pub enum SpecError {
    /// A field failed validation. `field` carries the serialized tag name so
    /// the message matches the on-disk schema vocabulary.
    #[error("invalid spec field `{field}`: {reason}")]
    Validation { field: &'static str, reason: String },

    /// The document could not be (de)serialized.
    #[error("malformed spec document: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Refusing to overwrite an existing file.
    #[error("{} already exists, use --force to overwrite", .0.display())]
    AlreadyExists(std::path::PathBuf),

    /// Filesystem failure while writing the document.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// In-memory representation of the YAML configuration document.
///
/// Constructed with defaults, overwritten by deserializing a file, then
/// validated before any command logic proceeds. Concurrent access goes
/// through the lock held by [`Config`](crate::Config).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spec {
    /// Schema version; must equal [`SPEC_VERSION`].
    pub version: u32,

    /// Working folder name, relative to the home directory.
    #[serde(default = "default_folder")]
    pub folder: String,
}

fn default_folder() -> String {
    DEFAULT_FOLDER.to_string()
}

impl Default for Spec {
    fn default() -> Self {
        Self {
            version: SPEC_VERSION,
            folder: default_folder(),
        }
    }
}

impl Spec {
    /// Deserialize a spec document.
    ///
    /// `folder` falls back to [`DEFAULT_FOLDER`] when the document omits
    /// it; unknown fields are ignored. The result is not validated.
    pub fn from_yaml(data: &[u8]) -> Result<Self> {
        Ok(serde_yaml::from_slice(data)?)
    }

    /// Serialize this spec as a YAML document.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Field-level validation.
    ///
    /// Returns the first failure, naming the offending field by its
    /// serialized tag name. Reentrant: no rule state is cached between
    /// calls.
    pub fn validate(&self) -> Result<()> {
        if self.version != SPEC_VERSION {
            return Err(SpecError::Validation {
                field: "version",
                reason: format!("must equal {SPEC_VERSION}, got {}", self.version),
            });
        }

        if self.folder.is_empty() {
            return Err(SpecError::Validation {
                field: "folder",
                reason: "must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Serialize this spec to `path`.
    ///
    /// Refuses to overwrite an existing file unless `force` is set.
    pub fn write(&self, path: &Path, force: bool) -> Result<()> {
        if path.exists() && !force {
            return Err(SpecError::AlreadyExists(path.to_path_buf()));
        }

        fs::write(path, self.to_yaml()?)?;
        Ok(())
    }
}
