//! Extension management: capability contract, discovery, loading, registry.
//!
//! Extensions are native dynamic libraries discovered under a per-user data
//! directory by naming convention (`oci-<name>`), loaded through a stable
//! C ABI with a versioned handshake, and registered as subcommands of the
//! host command tree.

pub mod loader;
pub mod manager;
pub mod scanner;

use std::path::PathBuf;

pub use loader::{load, LoadedExtension};
pub use manager::ExtensionManager;
pub use scanner::{scan, EXTENSION_PREFIX};

/// Sentinel for metadata an extension does not provide.
pub const UNKNOWN: &str = "unknown";

/// Result type for extension operations.
pub type Result<T> = std::result::Result<T, ExtensionError>;

/// Extension error types.
#[derive(Debug, thiserror::Error)]
pub enum ExtensionError {
    /// Directory walk failed during discovery.
    #[error("extension discovery failed: {0}")]
    Discovery(String),

    /// The artifact could not be opened as a dynamic library.
    #[error("failed to load extension: {0}")]
    LoadFailed(String),

    /// The artifact does not export the well-known entry symbol.
    #[error("missing entry symbol `{symbol}` in {}", .path.display())]
    SymbolNotFound { path: PathBuf, symbol: &'static str },

    /// The artifact's descriptor was built against a different ABI.
    #[error("incompatible extension ABI in {}: expected {expected}, got {got}", .path.display())]
    IncompatibleAbi {
        path: PathBuf,
        expected: u32,
        got: u32,
    },

    /// The resolved symbol does not satisfy the extension contract.
    #[error("{} does not implement the extension contract", .0.display())]
    DoesNotImplement(PathBuf),

    /// Arguments could not be passed across the extension boundary.
    #[error("invalid extension arguments: {0}")]
    InvalidArguments(String),

    /// The extension's command reported a failure.
    #[error("extension `{name}` failed with exit code {code}")]
    ExecutionFailed { name: String, code: i32 },

    /// No extension with the given name is registered.
    #[error("extension not found: {0}")]
    NotFound(String),

    /// The unimplemented sentinel was asked to run.
    #[error("extension is not implemented")]
    Unimplemented,
}

/// Context handed to an extension command invocation.
///
/// The dry-run flag is advisory: the host never blocks execution, each
/// extension is responsible for honoring it.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunContext {
    /// Suppress side effects where the extension supports it.
    pub dry_run: bool,
}

/// Capability contract every pluggable command artifact must satisfy.
///
/// All accessors are total: missing information is reported as [`UNKNOWN`],
/// never as an error. The loader rejects artifacts that cannot satisfy the
/// full contract, so every `Extension` handed out by this module is
/// complete.
pub trait Extension: std::fmt::Debug + Send + Sync {
    /// Stable identifier; also the suffix of the `oci-` naming convention
    /// used during discovery.
    fn name(&self) -> &str;

    /// Origin location of the artifact, or [`UNKNOWN`] if not file-backed.
    fn path(&self) -> &str;

    /// Extension version, or [`UNKNOWN`].
    fn version(&self) -> &str;

    /// Extension owner, or [`UNKNOWN`].
    fn owner(&self) -> &str;

    /// The subcommand node this extension contributes to the host tree.
    fn command(&self) -> clap::Command;

    /// Execute the contributed command with the leftover argv.
    fn run(&self, ctx: &RunContext, args: &[String]) -> Result<()>;
}

/// Safe stand-in used where a concrete extension is not available.
///
/// Every accessor returns a sentinel and running it always fails; it never
/// comes out of the loader, which rejects partial artifacts outright.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnimplementedExtension;

impl Extension for UnimplementedExtension {
    fn name(&self) -> &str {
        "unimplemented"
    }

    fn path(&self) -> &str {
        UNKNOWN
    }

    fn version(&self) -> &str {
        UNKNOWN
    }

    fn owner(&self) -> &str {
        UNKNOWN
    }

    fn command(&self) -> clap::Command {
        clap::Command::new(self.name().to_string()).hide(true)
    }

    fn run(&self, _ctx: &RunContext, _args: &[String]) -> Result<()> {
        Err(ExtensionError::Unimplemented)
    }
}
