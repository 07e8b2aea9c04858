use thiserror::Error;

use crate::{
    client::ApiError,
    configuration::ConfigurationError,
    exit_codes::CliExitCode,
    format::FormattingError,
    ui::{pipeline::PipelineError, program::TerminalError},
};

/// Error types that can occur during CLI command execution
#[derive(Debug, Error)]
pub enum CliError {
    /// Error when an unsupported or undefined subcommand is encountered
    #[error("Undefined or unsupported subcommand: {0}")]
    UnsupportedSubcommand(String),
    /// Error related to configuration loading or management
    #[error("Configuration error: {0}")]
    ConfigurationError(#[from] ConfigurationError),
    /// Error related to data formatting
    #[error("Formatting error: {0}")]
    FormattingError(#[from] FormattingError),
    /// Error when a required command-line argument is missing
    #[error("Missing required argument: {0}")]
    MissingRequiredArgument(String),
    /// The token file exists but cannot be used
    #[error("Failed to read the token file: {0}")]
    TokenFile(String),
    /// A backend call failed
    #[error("{0}")]
    Api(#[from] ApiError),
    /// Resolving the command's fields failed
    #[error("{0}")]
    Pipeline(#[from] PipelineError),
    #[error("{0}")]
    Terminal(#[from] TerminalError),
    /// The user left a screen before it finished
    #[error("cancelled by the user")]
    Cancelled,
}

fn api_exit_code(error: &ApiError) -> CliExitCode {
    match error {
        ApiError::HttpError(e) if e.is_connect() || e.is_timeout() => CliExitCode::NetworkError,
        ApiError::UnexpectedStatus { status: 401 | 403, .. } => CliExitCode::AuthError,
        ApiError::InvalidUrl(_) => CliExitCode::ConfigError,
        ApiError::JsonError(_) => CliExitCode::DataError,
        _ => CliExitCode::ApiError,
    }
}

impl CliError {
    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> CliExitCode {
        match self {
            CliError::UnsupportedSubcommand(_) | CliError::MissingRequiredArgument(_) => {
                CliExitCode::UsageError
            }
            CliError::ConfigurationError(_) | CliError::TokenFile(_) => CliExitCode::ConfigError,
            CliError::FormattingError(_) => CliExitCode::DataError,
            CliError::Api(error) => api_exit_code(error),
            CliError::Pipeline(PipelineError::Required(_)) => CliExitCode::UsageError,
            CliError::Pipeline(PipelineError::Options(error)) => api_exit_code(error),
            CliError::Pipeline(PipelineError::Cancelled) | CliError::Cancelled => CliExitCode::Cancelled,
            CliError::Pipeline(PipelineError::Terminal(_)) | CliError::Terminal(_) => CliExitCode::IoError,
        }
    }

    /// Cancellations end the process quietly.
    pub fn is_cancelled(&self) -> bool {
        self.exit_code() == CliExitCode::Cancelled
    }
}
