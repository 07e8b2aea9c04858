use cloud_cli::{
    cli::execute_command,
    commands::{
        create_cli_commands,
        params::{PARAMETER_DEBUG, PARAMETER_VERBOSE},
    },
    configuration::Configuration,
    error::CliError,
    error_utils::report_error,
    ui::program::LogWriter,
};
use clap::ArgMatches;
use tracing_subscriber::EnvFilter;

/// `RUST_LOG` wins; otherwise the verbosity flags pick the level.
fn log_filter(matches: &ArgMatches) -> EnvFilter {
    let leaf = cloud_cli::param_utils::leaf_matches(matches);
    let default_level = if leaf.get_flag(PARAMETER_DEBUG) {
        "cloud_cli=trace"
    } else if leaf.get_flag(PARAMETER_VERBOSE) {
        "cloud_cli=debug"
    } else {
        "cloud_cli=warn"
    };

    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

async fn run(matches: &ArgMatches) -> Result<(), CliError> {
    let configuration = Configuration::load_default_if_present()?;
    execute_command(configuration, matches).await
}

/// Main entry point for the program
#[tokio::main]
async fn main() {
    let matches = create_cli_commands();

    // Initialize the logging subsystem; logs go to stderr, held back while a screen is drawn
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(&matches))
        .with_writer(LogWriter::default)
        .init();

    if let Err(error) = run(&matches).await {
        if !error.is_cancelled() {
            report_error(&error);
        }
        std::process::exit(error.exit_code().code());
    }
}
