use std::path::PathBuf;

use clap::{parser::ValueSource, ArgMatches};
use tracing::debug;

use crate::{
    commands::params::{PARAMETER_API_DOMAIN, PARAMETER_AUTH_DOMAIN, PARAMETER_ENV, PARAMETER_ORG},
    configuration::Configuration,
    error::CliError,
    format::{Formattable, OutputFormat},
    param_utils::optional_string,
};

pub fn configuration_path() -> Result<PathBuf, CliError> {
    Ok(Configuration::get_default_configuration_file_path()?)
}

pub fn show_configuration(configuration: &Configuration, format: &OutputFormat) -> Result<String, CliError> {
    Ok(configuration.format(format)?)
}

/// A value typed on the command line; environment variables are not stored.
fn typed(sub_matches: &ArgMatches, name: &str) -> Option<String> {
    match sub_matches.value_source(name) {
        Some(ValueSource::CommandLine) => optional_string(sub_matches, name),
        _ => None,
    }
}

/// Copy the global option flags into the configuration.
pub fn set_configuration(configuration: &mut Configuration, sub_matches: &ArgMatches) -> Result<(), CliError> {
    let mut changed = false;

    if let Some(api_domain) = typed(sub_matches, PARAMETER_API_DOMAIN) {
        configuration.set_api_domain(api_domain)?;
        changed = true;
    }
    if let Some(auth_domain) = typed(sub_matches, PARAMETER_AUTH_DOMAIN) {
        configuration.set_auth_domain(auth_domain);
        changed = true;
    }
    if let Some(org) = typed(sub_matches, PARAMETER_ORG) {
        configuration.set_org(org);
        changed = true;
    }
    if let Some(env) = typed(sub_matches, PARAMETER_ENV) {
        configuration.set_env(env);
        changed = true;
    }

    if !changed {
        return Err(CliError::MissingRequiredArgument(format!(
            "one of --{}, --{}, --{} or --{}",
            PARAMETER_ORG, PARAMETER_ENV, PARAMETER_API_DOMAIN, PARAMETER_AUTH_DOMAIN
        )));
    }
    debug!("Configuration updated: {:?}", configuration);
    Ok(())
}
