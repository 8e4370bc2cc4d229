//! Process-wide configuration holder.

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::{Mutex, MutexGuard};

use crate::spec::{self, Spec, SpecError};

/// Result type for config operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Config error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The user's home directory could not be determined.
    #[error("home directory not found")]
    HomeDirNotFound,

    /// The configuration file could not be read.
    #[error("failed to read config file {}: {source}", .path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document failed to parse or validate.
    #[error(transparent)]
    Spec(#[from] SpecError),
}

/// Command line flags shared across commands.
#[derive(Debug, Clone, Copy, Default)]
pub struct Flags {
    /// Dry run mode.
    pub dry: bool,
    /// Force mode.
    pub force: bool,
    /// Run as root.
    pub root: bool,
    /// Verbose output.
    pub verbose: bool,
}

/// Process-wide holder of the config file path, flag values and the spec.
///
/// Constructed once at process entry and passed by reference to every
/// component that needs it; held for the process lifetime. Two independent
/// locks: [`spec`](Self::spec) hands out the spec under its own mutex,
/// while a separate load lock is held across the whole load-then-validate
/// sequence so no reader ever observes a spec that has been loaded but not
/// yet validated.
pub struct Config {
    /// Path to the configuration file. `~` is expanded by
    /// [`init`](Self::init).
    pub file: PathBuf,
    /// CLI flag values.
    pub flags: Flags,

    spec: Mutex<Spec>,
    load: Mutex<()>,
}

impl Config {
    /// Config pointing at the default file `~/.ocictl.yml`.
    pub fn new() -> Self {
        Self::with_file(PathBuf::from(format!("~/{}", spec::DEFAULT_FILENAME)))
    }

    /// Config pointing at an explicit file.
    pub fn with_file(file: PathBuf) -> Self {
        Self {
            file,
            flags: Flags::default(),
            spec: Mutex::new(Spec::default()),
            load: Mutex::new(()),
        }
    }

    /// Expand the home directory in the config file path.
    pub fn init(&mut self) -> Result<()> {
        self.file = expand_home(&self.file)?;
        Ok(())
    }

    /// Load the spec from the config file and validate it.
    ///
    /// The whole sequence runs under the load lock, and the parsed document
    /// is validated before it is published into the shared spec, so
    /// concurrent readers never see a loaded-but-unvalidated document.
    pub fn load_spec(&self) -> Result<()> {
        let _guard = self.load.lock();

        let data = fs::read(&self.file).map_err(|source| ConfigError::FileAccess {
            path: self.file.clone(),
            source,
        })?;

        let parsed = Spec::from_yaml(&data)?;
        parsed.validate()?;

        *self.spec.lock() = parsed;
        Ok(())
    }

    /// Direct access to the spec under its own lock.
    pub fn spec(&self) -> MutexGuard<'_, Spec> {
        self.spec.lock()
    }

    /// The fixed per-user directory scanned for extension artifacts.
    pub fn extensions_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::HomeDirNotFound)?;
        Ok(home.join(spec::DEFAULT_FOLDER).join("extensions"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

/// Expand a leading `~/` to the user's home directory.
///
/// Paths without the prefix (and non-UTF-8 paths) pass through unchanged.
fn expand_home(path: &Path) -> Result<PathBuf> {
    let Some(text) = path.to_str() else {
        return Ok(path.to_path_buf());
    };

    match text.strip_prefix("~/") {
        Some(rest) => {
            let home = dirs::home_dir().ok_or(ConfigError::HomeDirNotFound)?;
            Ok(home.join(rest))
        }
        None => Ok(path.to_path_buf()),
    }
}
