//! Console output helpers and process exit codes.

use crate::errors::ReadmeError;
use std::fmt::Display;
use std::io::{self, Write};

/// Context for controlling output verbosity
pub struct OutputContext {
    quiet: bool,
}

impl OutputContext {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    /// Print essential output (always shown)
    pub fn print_data(&self, msg: impl Display) -> io::Result<()> {
        writeln_safe(&format!("{}", msg))
    }

    /// Print informational message (suppressed by --quiet)
    pub fn print_info(&self, msg: impl Display) -> io::Result<()> {
        if !self.quiet {
            writeln_safe(&format!("{}", msg))
        } else {
            Ok(())
        }
    }
}

/// Safe println that handles broken pipes gracefully
fn writeln_safe(msg: &str) -> io::Result<()> {
    match writeln!(io::stdout(), "{}", msg) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
            // Expected when piping to head, etc.
            std::process::exit(0);
        }
        Err(e) => Err(e),
    }
}

/// Standard exit codes for the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Command succeeded (0)
    Success = 0,

    /// Generic error (1)
    GenericError = 1,

    /// Invalid arguments, configuration, or manifest (2)
    InvalidArgument = 2,

    /// Resource not found - no table, missing manifest (3)
    NotFound = 3,

    /// File system failure (10)
    ExternalError = 10,
}

impl ExitCode {
    /// Convert exit code to i32 for `std::process::exit`
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Exit code for an error, looking for a [`ReadmeError`] or I/O error in
    /// the chain.
    pub fn from_error(error: &anyhow::Error) -> Self {
        for cause in error.chain() {
            if let Some(err) = cause.downcast_ref::<ReadmeError>() {
                return match err {
                    ReadmeError::InvalidArgument(_) | ReadmeError::Config(_) => {
                        ExitCode::InvalidArgument
                    }
                    ReadmeError::NotFound(_) => ExitCode::NotFound,
                    ReadmeError::Storage { source, .. }
                        if source.kind() == io::ErrorKind::NotFound =>
                    {
                        ExitCode::NotFound
                    }
                    ReadmeError::Storage { .. } => ExitCode::ExternalError,
                };
            }
            if let Some(io_error) = cause.downcast_ref::<io::Error>() {
                return match io_error.kind() {
                    io::ErrorKind::NotFound => ExitCode::NotFound,
                    _ => ExitCode::ExternalError,
                };
            }
        }
        ExitCode::GenericError
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success.code(), 0);
        assert_eq!(ExitCode::InvalidArgument.code(), 2);
        assert_eq!(ExitCode::NotFound.code(), 3);
        assert_eq!(ExitCode::ExternalError.code(), 10);
    }

    #[test]
    fn test_exit_code_from_wrapped_readme_error() {
        let result: Result<(), ReadmeError> =
            Err(ReadmeError::NotFound("No tables found in the README".into()));
        let err = result.context("Failed to add column").unwrap_err();

        assert_eq!(ExitCode::from_error(&err), ExitCode::NotFound);
    }

    #[test]
    fn test_exit_code_for_storage_errors() {
        let denied = anyhow::Error::new(ReadmeError::storage(
            "write",
            "README.md",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        ));
        let missing = anyhow::Error::new(ReadmeError::storage(
            "read",
            "catalog.toml",
            io::Error::new(io::ErrorKind::NotFound, "missing"),
        ));

        assert_eq!(ExitCode::from_error(&denied), ExitCode::ExternalError);
        assert_eq!(ExitCode::from_error(&missing), ExitCode::NotFound);
    }

    #[test]
    fn test_exit_code_generic_fallback() {
        let err = anyhow::anyhow!("something odd");
        assert_eq!(ExitCode::from_error(&err), ExitCode::GenericError);
    }
}
