//! Hello extension for `ocictl`.
//!
//! The canonical smoke test for the extension pipeline: build this crate
//! and install the resulting library as
//! `~/.ocictl/extensions/oci-hello.<so|dylib|dll>`, then run
//! `ocictl hello [name]`.

use ocictl_extension_sdk::prelude::*;

fn run(args: &[String], dry_run: bool) -> Result<(), ExtensionFailure> {
    if dry_run {
        println!("hello: dry run, skipping the greeting");
        return Ok(());
    }

    match args.first() {
        Some(name) => println!("Hello {name}!"),
        None => println!("Hello world!"),
    }
    Ok(())
}

export_extension! {
    name: "hello",
    version: env!("CARGO_PKG_VERSION"),
    owner: "oci",
    about: "Prints a greeting",
    run: run,
}
