//! Error type for extension entry points.

/// Failure raised by an extension's run function.
///
/// The shim generated by [`export_extension!`](crate::export_extension)
/// prints the failure to stderr and reports a non-zero exit code to the
/// host.
#[derive(Debug, thiserror::Error)]
pub enum ExtensionFailure {
    /// The extension rejected its arguments.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// The extension's work failed.
    #[error("{0}")]
    Failed(String),
}

impl ExtensionFailure {
    /// Shorthand for a plain failure message.
    pub fn msg(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

impl From<std::io::Error> for ExtensionFailure {
    fn from(err: std::io::Error) -> Self {
        Self::Failed(err.to_string())
    }
}
