//! SDK for building `ocictl` extensions.
//!
//! An extension is a native dynamic library (`.so`, `.dylib`, `.dll`) that
//! exports a single well-known symbol, [`DESCRIPTOR_SYMBOL`], holding a
//! [`CExtensionDescriptor`]. The host resolves the symbol, checks the
//! [`ABI_VERSION`] handshake, copies the metadata out of the descriptor and
//! registers the extension's command in its command tree.
//!
//! # Quick start
//!
//! ```rust
//! use ocictl_extension_sdk::prelude::*;
//!
//! fn run(args: &[String], dry_run: bool) -> Result<(), ExtensionFailure> {
//!     if dry_run {
//!         return Ok(());
//!     }
//!     println!("greetings, {}", args.first().map_or("world", String::as_str));
//!     Ok(())
//! }
//!
//! export_extension! {
//!     name: "greet",
//!     version: "1.0.0",
//!     owner: "oci",
//!     about: "Greets the caller",
//!     run: run,
//! }
//! ```
//!
//! Build the crate as a `cdylib` and install the artifact under the host's
//! extension directory with an `oci-` file name prefix, e.g.
//! `~/.ocictl/extensions/oci-greet.so`.

pub mod descriptor;
mod error;
#[macro_use]
pub mod macros;

pub use descriptor::{args_from_raw, CExtensionDescriptor, RunFn, ABI_VERSION, DESCRIPTOR_SYMBOL};
pub use error::ExtensionFailure;

/// Prelude module with the imports an extension crate needs.
pub mod prelude {
    pub use crate::descriptor::{CExtensionDescriptor, RunFn, ABI_VERSION, DESCRIPTOR_SYMBOL};
    pub use crate::error::ExtensionFailure;
    pub use crate::export_extension;
}
