//! Exit codes of the cloud CLI.
//!
//! Standard failures reuse the BSD sysexits values from the `exitcode` crate.
//! Codes from 100 up are specific to this application, and a cancellation by
//! the user exits like an interrupted process.

/// Process exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum CliExitCode {
    Success = exitcode::OK,

    /// Command line usage error, including a required value left empty
    UsageError = exitcode::USAGE,

    /// Data format error
    DataError = exitcode::DATAERR,

    /// Internal software error
    SoftwareError = exitcode::SOFTWARE,

    /// Terminal or file I/O failed
    IoError = exitcode::IOERR,

    /// Configuration error
    ConfigError = exitcode::CONFIG,

    /// Authentication error (100) - missing or rejected token
    AuthError = 100,

    /// Network error (101) - the API could not be reached
    NetworkError = 101,

    /// API error (102) - Remote API returned an error
    ApiError = 102,

    /// Cancelled (130) - the user left an interactive screen
    Cancelled = 130,
}

impl CliExitCode {
    pub fn code(&self) -> i32 {
        *self as i32
    }

    pub fn message(&self) -> &'static str {
        match self {
            CliExitCode::Success => "Success",
            CliExitCode::UsageError => "Command line usage error",
            CliExitCode::DataError => "Data format error",
            CliExitCode::SoftwareError => "Internal software error",
            CliExitCode::IoError => "Input/output error",
            CliExitCode::ConfigError => "Configuration error",
            CliExitCode::AuthError => "Authentication error",
            CliExitCode::NetworkError => "Network communication error",
            CliExitCode::ApiError => "Remote API error",
            CliExitCode::Cancelled => "Cancelled by the user",
        }
    }
}

impl From<CliExitCode> for i32 {
    fn from(code: CliExitCode) -> Self {
        code.code()
    }
}
