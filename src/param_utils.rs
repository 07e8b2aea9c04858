//! Resolution of the global options.
//!
//! Every setting is taken from the first source that has it: the command line
//! flag, its environment variable (both handled by clap), the configuration
//! file and finally the built-in default.

use std::{collections::HashMap, fs, path::Path};

use clap::ArgMatches;
use tracing::{debug, trace};
use url::Url;

use crate::{
    commands::params::{
        PARAMETER_API_DOMAIN, PARAMETER_AUTH_DOMAIN, PARAMETER_DEBUG, PARAMETER_ENV, PARAMETER_FORMAT,
        PARAMETER_HEADERS, PARAMETER_ORG, PARAMETER_PRETTY, PARAMETER_TOKEN,
    },
    configuration::{Configuration, ConfigurationError, DEFAULT_API_DOMAIN, DEFAULT_AUTH_DOMAIN},
    context::Settings,
    error::CliError,
    format::{OutputFormat, OutputFormatOptions, TABLE},
    ui::{pipeline::FormResult, program::Mode},
};

/// Directory under the home directory that holds the token file
pub const TOKEN_DIRECTORY: &str = ".aptible";
pub const TOKEN_FILE_NAME: &str = "tokens.json";

/// Options shared by every command, resolved once per invocation.
#[derive(Debug, Clone)]
pub struct CommandOptions {
    pub settings: Settings,
    pub org: Option<String>,
    pub env: Option<String>,
    pub format: OutputFormat,
    pub mode: Mode,
}

impl CommandOptions {
    /// `matches` must be the innermost subcommand, where clap propagates the global options.
    pub fn from_matches(matches: &ArgMatches, configuration: &Configuration) -> Result<Self, CliError> {
        let api_domain = optional_string(matches, PARAMETER_API_DOMAIN)
            .or_else(|| configuration.api_domain().map(str::to_string))
            .unwrap_or_else(|| DEFAULT_API_DOMAIN.to_string());
        let api_domain = Url::parse(&api_domain).map_err(|_| ConfigurationError::InvalidPropertyValue {
            name: "api_domain".to_string(),
            value: api_domain.clone(),
        })?;

        let auth_domain = optional_string(matches, PARAMETER_AUTH_DOMAIN)
            .or_else(|| configuration.auth_domain().map(str::to_string))
            .unwrap_or_else(|| DEFAULT_AUTH_DOMAIN.to_string());

        let token = match optional_string(matches, PARAMETER_TOKEN) {
            Some(token) => Some(token),
            None => match dirs::home_dir() {
                Some(home) => find_token(&home, &auth_domain)?,
                None => None,
            },
        };

        let org = optional_string(matches, PARAMETER_ORG).or_else(|| configuration.org().map(str::to_string));
        let env = optional_string(matches, PARAMETER_ENV).or_else(|| configuration.env().map(str::to_string));
        trace!("Resolved org {:?}, env {:?}", org, env);

        Ok(CommandOptions {
            settings: Settings {
                api_domain,
                auth_domain,
                token,
                debug: flag(matches, PARAMETER_DEBUG),
            },
            org,
            env,
            format: get_format_parameter_value(matches)?,
            mode: Mode::Auto,
        })
    }

    /// Values the pipelines must not ask for again.
    pub fn seed(&self) -> FormResult {
        FormResult {
            org: self.org.clone().unwrap_or_default(),
            env: self.env.clone().unwrap_or_default(),
            ..Default::default()
        }
    }
}

/// Build the output format from the format flags.
pub fn get_format_parameter_value(matches: &ArgMatches) -> Result<OutputFormat, CliError> {
    let format = optional_string(matches, PARAMETER_FORMAT).unwrap_or_else(|| TABLE.to_string());
    let options = OutputFormatOptions {
        with_headers: flag(matches, PARAMETER_HEADERS),
        pretty: flag(matches, PARAMETER_PRETTY),
    };
    trace!("Format: {} ({:?})", format, options);

    Ok(OutputFormat::from_string_with_options(&format, options)?)
}

/// Look up the token stored for `auth_domain` in `<home>/.aptible/tokens.json`.
///
/// A missing file or a missing entry is not an error.
pub fn find_token(home: &Path, auth_domain: &str) -> Result<Option<String>, CliError> {
    let path = home.join(TOKEN_DIRECTORY).join(TOKEN_FILE_NAME);
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) => {
            debug!("No token file at {}: {}", path.display(), e);
            return Ok(None);
        }
    };

    let tokens: HashMap<String, String> = serde_json::from_str(&text)
        .map_err(|e| CliError::TokenFile(format!("{}: {}", path.display(), e)))?;
    Ok(tokens.get(auth_domain).cloned())
}

/// Values of arguments the command does not define are treated as absent.
pub fn optional_string(matches: &ArgMatches, name: &str) -> Option<String> {
    matches
        .try_get_one::<String>(name)
        .ok()
        .flatten()
        .filter(|value| !value.is_empty())
        .cloned()
}

fn flag(matches: &ArgMatches, name: &str) -> bool {
    matches.try_get_one::<bool>(name).ok().flatten().copied().unwrap_or(false)
}

/// The innermost subcommand of a parsed command line.
pub fn leaf_matches(matches: &ArgMatches) -> &ArgMatches {
    match matches.subcommand() {
        Some((_, sub_matches)) => leaf_matches(sub_matches),
        None => matches,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::cli_command;
    use tempfile::tempdir;

    fn leaf(args: &[&str]) -> ArgMatches {
        let matches = cli_command().try_get_matches_from(args).unwrap();
        leaf_matches(&matches).clone()
    }

    #[test]
    fn flags_take_precedence_over_the_configuration() {
        let mut configuration = Configuration::default();
        configuration.set_org("from-config");
        configuration.set_env("env-config");
        configuration.set_api_domain("https://config.example.com").unwrap();

        let matches = leaf(&[
            "cloud",
            "env",
            "ls",
            "--org",
            "from-flag",
            "--api-domain",
            "https://flag.example.com",
            "--token",
            "t",
        ]);
        let options = CommandOptions::from_matches(&matches, &configuration).unwrap();

        assert_eq!(options.org.as_deref(), Some("from-flag"));
        assert_eq!(options.settings.api_domain.as_str(), "https://flag.example.com/");
        assert_eq!(options.settings.token.as_deref(), Some("t"));

        let seed = options.seed();
        assert_eq!(seed.org, "from-flag");
        assert!(seed.asset.is_empty());
    }

    #[test]
    fn configuration_fills_what_flags_leave_out() {
        let mut configuration = Configuration::default();
        configuration.set_env("env-config");
        configuration.set_auth_domain("https://auth.example.com");

        let matches = leaf(&["cloud", "asset", "ls", "--token", "t", "--env", ""]);
        let options = CommandOptions::from_matches(&matches, &configuration).unwrap();

        assert_eq!(options.env.as_deref(), Some("env-config"));
        assert_eq!(options.settings.auth_domain, "https://auth.example.com");
    }

    #[test]
    fn invalid_api_domain_is_a_configuration_error() {
        let mut configuration = Configuration::default();
        configuration.set_org("o");
        let matches = leaf(&["cloud", "org", "ls", "--api-domain", "not a url", "--token", "t"]);

        let error = CommandOptions::from_matches(&matches, &configuration).unwrap_err();
        assert!(matches!(error, CliError::ConfigurationError(_)));
    }

    #[test]
    fn format_flags_build_the_output_format() {
        let matches = leaf(&["cloud", "org", "ls", "-f", "csv", "--headers"]);
        let format = get_format_parameter_value(&matches).unwrap();

        assert!(matches!(format, OutputFormat::Csv(ref options) if options.with_headers && !options.pretty));
    }

    #[test]
    fn token_is_read_for_the_auth_domain() {
        let home = tempdir().unwrap();
        let directory = home.path().join(TOKEN_DIRECTORY);
        fs::create_dir_all(&directory).unwrap();
        fs::write(
            directory.join(TOKEN_FILE_NAME),
            r#"{"https://auth.aptible.com": "secret", "https://other": "nope"}"#,
        )
        .unwrap();

        assert_eq!(
            find_token(home.path(), "https://auth.aptible.com").unwrap().as_deref(),
            Some("secret")
        );
        assert_eq!(find_token(home.path(), "https://missing").unwrap(), None);
    }

    #[test]
    fn missing_token_file_is_not_an_error() {
        let home = tempdir().unwrap();
        assert_eq!(find_token(home.path(), DEFAULT_AUTH_DOMAIN).unwrap(), None);
    }

    #[test]
    fn malformed_token_file_is_reported() {
        let home = tempdir().unwrap();
        let directory = home.path().join(TOKEN_DIRECTORY);
        fs::create_dir_all(&directory).unwrap();
        fs::write(directory.join(TOKEN_FILE_NAME), "not json").unwrap();

        assert!(matches!(
            find_token(home.path(), DEFAULT_AUTH_DOMAIN),
            Err(CliError::TokenFile(_))
        ));
    }
}
