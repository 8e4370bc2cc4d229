//! Core library for `ocictl`.
//!
//! Two subsystems live here: the extension management layer (discovery,
//! loading, registry) under [`extension`], and the lock-guarded
//! configuration specification under [`spec`] and [`config`]. The CLI crate
//! owns the command tree; this crate owns everything the tree is built
//! from.

pub mod config;
pub mod extension;
pub mod spec;

pub use config::{Config, Flags};
pub use extension::{Extension, ExtensionError, ExtensionManager, RunContext, UNKNOWN};
pub use spec::Spec;
