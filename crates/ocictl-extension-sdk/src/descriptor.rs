//! The C-compatible extension descriptor.
//!
//! The descriptor is the entire contract between the host and an extension
//! artifact: a `#[repr(C)]` struct baked into the artifact as a static and
//! resolved by the host through [`DESCRIPTOR_SYMBOL`]. Versioning happens
//! through the `abi_version` field, not through symbol proliferation.

use std::ffi::CStr;
use std::os::raw::c_char;

/// ABI version for dynamic loading.
///
/// Incremented when breaking changes are made to [`CExtensionDescriptor`].
/// The host refuses descriptors carrying any other value.
pub const ABI_VERSION: u32 = 1;

/// The single well-known symbol every extension artifact must export.
pub const DESCRIPTOR_SYMBOL: &str = "oci_extension_descriptor";

/// Signature of the extension's command entry point.
///
/// `argv` points to `argc` NUL-terminated strings, the arguments left over
/// after the host parsed its own command line. `dry_run` is advisory; the
/// extension is responsible for honoring it. A zero return value is success,
/// anything else is reported by the host as an execution failure.
pub type RunFn = unsafe extern "C" fn(argc: usize, argv: *const *const c_char, dry_run: bool) -> i32;

/// C-compatible extension descriptor.
///
/// String fields are NUL-terminated and may be null where the extension has
/// nothing to report; the host substitutes its "unknown" sentinel. `name` and
/// `run` are required: a descriptor missing either does not satisfy the
/// extension contract and is rejected at load time.
#[repr(C)]
pub struct CExtensionDescriptor {
    /// Must equal [`ABI_VERSION`].
    pub abi_version: u32,
    /// Stable extension identifier (required, non-empty).
    pub name: *const c_char,
    /// Extension version (optional).
    pub version: *const c_char,
    /// Extension owner (optional).
    pub owner: *const c_char,
    /// One-line help text for the contributed command (optional).
    pub about: *const c_char,
    /// Command entry point (required).
    pub run: Option<RunFn>,
}

// Descriptor statics only ever point at immutable data baked into the
// artifact's image.
unsafe impl Sync for CExtensionDescriptor {}

/// Decode the argv handed across the C boundary into owned strings.
///
/// Null entries are skipped; invalid UTF-8 is replaced lossily.
///
/// # Safety
///
/// `argv` must be null or point to `argc` pointers, each of which is null or
/// points to a NUL-terminated string that stays valid for the duration of
/// the call.
pub unsafe fn args_from_raw(argc: usize, argv: *const *const c_char) -> Vec<String> {
    if argv.is_null() {
        return Vec::new();
    }

    (0..argc)
        .filter_map(|i| {
            let ptr = unsafe { *argv.add(i) };
            if ptr.is_null() {
                return None;
            }
            Some(unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    #[test]
    fn args_from_null_argv_are_empty() {
        let args = unsafe { args_from_raw(3, std::ptr::null()) };
        assert!(args.is_empty());
    }

    #[test]
    fn args_round_trip() {
        let owned: Vec<CString> = ["one", "two", "--three"]
            .iter()
            .map(|s| CString::new(*s).unwrap())
            .collect();
        let ptrs: Vec<*const c_char> = owned.iter().map(|c| c.as_ptr()).collect();

        let args = unsafe { args_from_raw(ptrs.len(), ptrs.as_ptr()) };
        assert_eq!(args, vec!["one", "two", "--three"]);
    }

    #[test]
    fn null_entries_are_skipped() {
        let owned = CString::new("kept").unwrap();
        let ptrs: Vec<*const c_char> = vec![std::ptr::null(), owned.as_ptr()];

        let args = unsafe { args_from_raw(ptrs.len(), ptrs.as_ptr()) };
        assert_eq!(args, vec!["kept"]);
    }
}
