//! Export macro for extension crates.

/// Generate the FFI exports for an extension.
///
/// Expands to the [`CExtensionDescriptor`](crate::CExtensionDescriptor)
/// static the host resolves, plus a shim translating the C entry point into
/// a call to the given safe run function. `name`, `version`, `owner` and
/// `about` must be string literals (or `env!`/`concat!` expansions); `run`
/// is a path to a `fn(&[String], bool) -> Result<(), ExtensionFailure>`.
///
/// # Example
///
/// ```rust
/// use ocictl_extension_sdk::prelude::*;
///
/// fn run(_args: &[String], _dry_run: bool) -> Result<(), ExtensionFailure> {
///     Ok(())
/// }
///
/// export_extension! {
///     name: "noop",
///     version: env!("CARGO_PKG_VERSION"),
///     owner: "oci",
///     about: "Does nothing",
///     run: run,
/// }
/// ```
#[macro_export]
macro_rules! export_extension {
    (
        name: $name:expr,
        version: $version:expr,
        owner: $owner:expr,
        about: $about:expr,
        run: $run:path $(,)?
    ) => {
        #[no_mangle]
        #[allow(non_upper_case_globals)]
        pub static oci_extension_descriptor: $crate::CExtensionDescriptor =
            $crate::CExtensionDescriptor {
                abi_version: $crate::ABI_VERSION,
                name: concat!($name, "\0").as_ptr() as *const ::std::os::raw::c_char,
                version: concat!($version, "\0").as_ptr() as *const ::std::os::raw::c_char,
                owner: concat!($owner, "\0").as_ptr() as *const ::std::os::raw::c_char,
                about: concat!($about, "\0").as_ptr() as *const ::std::os::raw::c_char,
                run: Some(__oci_extension_run),
            };

        unsafe extern "C" fn __oci_extension_run(
            argc: usize,
            argv: *const *const ::std::os::raw::c_char,
            dry_run: bool,
        ) -> i32 {
            let args = unsafe { $crate::args_from_raw(argc, argv) };
            match $run(&args, dry_run) {
                Ok(()) => 0,
                Err(err) => {
                    eprintln!("{}: {}", $name, err);
                    1
                }
            }
        }
    };
}
