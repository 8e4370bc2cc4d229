//! Loading a single extension artifact through the C ABI.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::path::Path;

use libloading::{Library, Symbol};
use ocictl_extension_sdk::{CExtensionDescriptor, RunFn, ABI_VERSION, DESCRIPTOR_SYMBOL};

use super::{Extension, ExtensionError, Result, RunContext, UNKNOWN};

/// Load the artifact at `path` and type-check it against the extension
/// contract.
///
/// Loading is atomic: either a fully conforming extension is returned, with
/// the library handle kept alive inside it, or an error. No partial
/// extension ever escapes.
pub fn load(path: &Path) -> Result<Box<dyn Extension>> {
    let library = unsafe {
        Library::new(path)
            .map_err(|e| ExtensionError::LoadFailed(format!("{}: {e}", path.display())))?
    };

    let descriptor: Symbol<'_, *const CExtensionDescriptor> = unsafe {
        library
            .get(DESCRIPTOR_SYMBOL.as_bytes())
            .map_err(|_| ExtensionError::SymbolNotFound {
                path: path.to_path_buf(),
                symbol: DESCRIPTOR_SYMBOL,
            })?
    };

    let raw = *descriptor;
    if raw.is_null() {
        return Err(ExtensionError::DoesNotImplement(path.to_path_buf()));
    }

    let parsed = unsafe { parse_descriptor(path, &*raw) }?;
    tracing::debug!(name = %parsed.name, path = %path.display(), "loaded extension");

    Ok(Box::new(LoadedExtension {
        path: path.display().to_string(),
        name: parsed.name,
        version: parsed.version,
        owner: parsed.owner,
        about: parsed.about,
        run: parsed.run,
        _library: library,
    }))
}

/// Descriptor contents after validation, with every string copied onto the
/// host heap.
#[derive(Debug)]
struct ParsedDescriptor {
    name: String,
    version: String,
    owner: String,
    about: String,
    run: RunFn,
}

/// Validate a raw descriptor against the capability contract.
///
/// The ABI handshake runs first; a descriptor from another ABI cannot be
/// trusted beyond its leading version field. `name` and `run` are required,
/// the remaining strings fall back to the [`UNKNOWN`] sentinel.
///
/// # Safety
///
/// Non-null string fields must point to NUL-terminated strings that stay
/// valid for the duration of the call.
unsafe fn parse_descriptor(path: &Path, raw: &CExtensionDescriptor) -> Result<ParsedDescriptor> {
    if raw.abi_version != ABI_VERSION {
        return Err(ExtensionError::IncompatibleAbi {
            path: path.to_path_buf(),
            expected: ABI_VERSION,
            got: raw.abi_version,
        });
    }

    let name = unsafe { copy_c_str(raw.name) };
    let (name, run) = match (name, raw.run) {
        (Some(name), Some(run)) if !name.is_empty() => (name, run),
        _ => return Err(ExtensionError::DoesNotImplement(path.to_path_buf())),
    };

    Ok(ParsedDescriptor {
        name,
        version: unsafe { copy_c_str(raw.version) }.unwrap_or_else(|| UNKNOWN.to_string()),
        owner: unsafe { copy_c_str(raw.owner) }.unwrap_or_else(|| UNKNOWN.to_string()),
        about: unsafe { copy_c_str(raw.about) }.unwrap_or_default(),
        run,
    })
}

unsafe fn copy_c_str(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    Some(unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
}

/// Marshal `args` across the C boundary and dispatch the entry point.
fn invoke(run: RunFn, name: &str, ctx: &RunContext, args: &[String]) -> Result<()> {
    let owned: Vec<CString> = args
        .iter()
        .map(|a| CString::new(a.as_str()))
        .collect::<std::result::Result<_, _>>()
        .map_err(|e| ExtensionError::InvalidArguments(e.to_string()))?;
    let argv: Vec<*const c_char> = owned.iter().map(|c| c.as_ptr()).collect();

    let code = unsafe { run(argv.len(), argv.as_ptr(), ctx.dry_run) };
    if code == 0 {
        Ok(())
    } else {
        Err(ExtensionError::ExecutionFailed {
            name: name.to_string(),
            code,
        })
    }
}

/// Extension backed by a dynamically loaded artifact.
///
/// The library handle lives as long as the extension so the code behind the
/// run entry point stays mapped; there is no unload path.
#[derive(Debug)]
pub struct LoadedExtension {
    name: String,
    version: String,
    owner: String,
    about: String,
    path: String,
    run: RunFn,
    _library: Library,
}

impl Extension for LoadedExtension {
    fn name(&self) -> &str {
        &self.name
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn version(&self) -> &str {
        &self.version
    }

    fn owner(&self) -> &str {
        &self.owner
    }

    fn command(&self) -> clap::Command {
        let command = clap::Command::new(self.name.clone()).arg(
            clap::Arg::new("args")
                .num_args(0..)
                .trailing_var_arg(true)
                .allow_hyphen_values(true)
                .help("Arguments passed through to the extension"),
        );

        if self.about.is_empty() {
            command
        } else {
            command.about(self.about.clone())
        }
    }

    fn run(&self, ctx: &RunContext, args: &[String]) -> Result<()> {
        invoke(self.run, &self.name, ctx, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::ptr;

    unsafe extern "C" fn run_ok(_argc: usize, _argv: *const *const c_char, _dry: bool) -> i32 {
        0
    }

    unsafe extern "C" fn run_argc(argc: usize, _argv: *const *const c_char, _dry: bool) -> i32 {
        argc as i32
    }

    fn descriptor() -> CExtensionDescriptor {
        CExtensionDescriptor {
            abi_version: ABI_VERSION,
            name: c"tester".as_ptr(),
            version: c"1.2.3".as_ptr(),
            owner: c"oci".as_ptr(),
            about: ptr::null(),
            run: Some(run_ok),
        }
    }

    #[test]
    fn conforming_descriptor_parses() {
        let raw = descriptor();
        let parsed = unsafe { parse_descriptor(Path::new("oci-tester"), &raw) }.unwrap();

        assert_eq!(parsed.name, "tester");
        assert_eq!(parsed.version, "1.2.3");
        assert_eq!(parsed.owner, "oci");
        assert_eq!(parsed.about, "");
    }

    #[test]
    fn optional_fields_fall_back_to_unknown() {
        let raw = CExtensionDescriptor {
            version: ptr::null(),
            owner: ptr::null(),
            ..descriptor()
        };

        let parsed = unsafe { parse_descriptor(Path::new("oci-tester"), &raw) }.unwrap();
        assert_eq!(parsed.version, UNKNOWN);
        assert_eq!(parsed.owner, UNKNOWN);
    }

    #[test]
    fn missing_name_fails_the_contract() {
        let raw = CExtensionDescriptor {
            name: ptr::null(),
            ..descriptor()
        };

        let err = unsafe { parse_descriptor(Path::new("oci-bad"), &raw) }.unwrap_err();
        assert!(matches!(err, ExtensionError::DoesNotImplement(p) if p == Path::new("oci-bad")));
    }

    #[test]
    fn empty_name_fails_the_contract() {
        let raw = CExtensionDescriptor {
            name: c"".as_ptr(),
            ..descriptor()
        };

        let err = unsafe { parse_descriptor(Path::new("oci-bad"), &raw) }.unwrap_err();
        assert!(matches!(err, ExtensionError::DoesNotImplement(_)));
    }

    #[test]
    fn missing_run_fails_the_contract() {
        let raw = CExtensionDescriptor {
            run: None,
            ..descriptor()
        };

        let err = unsafe { parse_descriptor(Path::new("oci-bad"), &raw) }.unwrap_err();
        assert!(matches!(err, ExtensionError::DoesNotImplement(_)));
    }

    #[test]
    fn abi_mismatch_is_rejected_before_capabilities() {
        let raw = CExtensionDescriptor {
            abi_version: ABI_VERSION + 1,
            name: ptr::null(),
            ..descriptor()
        };

        let err = unsafe { parse_descriptor(Path::new("oci-old"), &raw) }.unwrap_err();
        assert!(matches!(
            err,
            ExtensionError::IncompatibleAbi { expected, got, .. }
                if expected == ABI_VERSION && got == ABI_VERSION + 1
        ));
    }

    #[test]
    fn invoke_reports_nonzero_exit() {
        let args = vec!["a".to_string(), "b".to_string()];
        let err = invoke(run_argc, "tester", &RunContext::default(), &args).unwrap_err();

        assert!(matches!(
            err,
            ExtensionError::ExecutionFailed { code: 2, .. }
        ));
    }

    #[test]
    fn invoke_succeeds_on_zero_exit() {
        invoke(run_ok, "tester", &RunContext { dry_run: true }, &[]).unwrap();
    }

    #[test]
    fn invoke_rejects_interior_nul() {
        let args = vec!["bad\0arg".to_string()];
        let err = invoke(run_ok, "tester", &RunContext::default(), &args).unwrap_err();
        assert!(matches!(err, ExtensionError::InvalidArguments(_)));
    }

    #[test]
    fn load_rejects_missing_artifact() {
        let err = load(Path::new("/nonexistent/oci-ghost")).unwrap_err();
        assert!(matches!(err, ExtensionError::LoadFailed(_)));
    }

    #[test]
    fn load_rejects_non_library_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("oci-not-a-library");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"definitely not ELF").unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, ExtensionError::LoadFailed(_)));
    }
}
