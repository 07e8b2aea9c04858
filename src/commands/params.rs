//! Shared command parameters for all CLI commands.
//!
//! This module defines common parameters that are used across multiple command modules.
//! It provides a centralized place to define parameter names and common argument configurations.

use crate::format::{OutputFormat, TABLE};
use clap::{Arg, ArgAction};

// Resource commands
pub const COMMAND_ORGANIZATION: &str = "organization";
pub const COMMAND_ENVIRONMENT: &str = "environment";
pub const COMMAND_ASSET: &str = "asset";
pub const COMMAND_DATASTORE: &str = "datastore";
pub const COMMAND_NETWORK: &str = "network";
pub const COMMAND_CONNECTION: &str = "connection";
pub const COMMAND_CONFIG: &str = "config";

// Operations
pub const COMMAND_CREATE: &str = "create";
pub const COMMAND_LIST: &str = "list";
pub const COMMAND_SHOW: &str = "show";
pub const COMMAND_DESCRIBE: &str = "describe";
pub const COMMAND_DESTROY: &str = "destroy";
pub const COMMAND_BUNDLE: &str = "bundle";
pub const COMMAND_PATH: &str = "path";
pub const COMMAND_SET: &str = "set";

// Global parameter names
pub const PARAMETER_ORG: &str = "org";
pub const PARAMETER_ENV: &str = "env";
pub const PARAMETER_TOKEN: &str = "token";
pub const PARAMETER_API_DOMAIN: &str = "api-domain";
pub const PARAMETER_AUTH_DOMAIN: &str = "auth-domain";
pub const PARAMETER_FORMAT: &str = "format";
pub const PARAMETER_PRETTY: &str = "pretty";
pub const PARAMETER_HEADERS: &str = "headers";
pub const PARAMETER_VERBOSE: &str = "verbose";
pub const PARAMETER_DEBUG: &str = "debug";

// Command parameter names
pub const PARAMETER_NAME: &str = "name";
pub const PARAMETER_DESCRIPTION: &str = "description";
pub const PARAMETER_ASSET: &str = "asset";
pub const PARAMETER_ASSET_NAME: &str = "asset-name";
pub const PARAMETER_ASSET_TYPE: &str = "asset-type";
pub const PARAMETER_VPC_NAME: &str = "vpc-name";
pub const PARAMETER_ENGINE: &str = "engine";
pub const PARAMETER_ENGINE_VERSION: &str = "engine-version";
pub const PARAMETER_OUTGOING_ASSET: &str = "outgoing-asset";
pub const PARAMETER_INCOMING_ASSET: &str = "incoming-asset";

// Environment variables backing the global parameters
pub const ENV_ORG: &str = "CLOUD_ORG";
pub const ENV_ENV: &str = "CLOUD_ENV";
pub const ENV_TOKEN: &str = "CLOUD_TOKEN";
pub const ENV_API_DOMAIN: &str = "CLOUD_API_DOMAIN";
pub const ENV_AUTH_DOMAIN: &str = "CLOUD_AUTH_DOMAIN";
pub const ENV_FORMAT: &str = "CLOUD_FORMAT";

/// Create the global format parameter.
///
/// This parameter is used across every command for output formatting.
pub fn format_parameter() -> Arg {
    Arg::new(PARAMETER_FORMAT)
        .short('f')
        .long(PARAMETER_FORMAT)
        .num_args(1)
        .required(false)
        .env(ENV_FORMAT)
        .default_value(TABLE)
        .global(true)
        .help("Output data format")
        .value_parser(OutputFormat::names())
}

pub fn format_pretty_parameter() -> Arg {
    Arg::new(PARAMETER_PRETTY)
        .long(PARAMETER_PRETTY)
        .action(ArgAction::SetTrue)
        .required(false)
        .global(true)
        .help("Format JSON output pretty")
}

pub fn format_with_headers_parameter() -> Arg {
    Arg::new(PARAMETER_HEADERS)
        .long(PARAMETER_HEADERS)
        .action(ArgAction::SetTrue)
        .required(false)
        .global(true)
        .help("Include a header row in CSV output")
}

pub fn org_parameter() -> Arg {
    Arg::new(PARAMETER_ORG)
        .long(PARAMETER_ORG)
        .num_args(1)
        .required(false)
        .env(ENV_ORG)
        .global(true)
        .help("Organization id (prompted for when omitted)")
}

pub fn env_parameter() -> Arg {
    Arg::new(PARAMETER_ENV)
        .long(PARAMETER_ENV)
        .num_args(1)
        .required(false)
        .env(ENV_ENV)
        .global(true)
        .help("Environment id (prompted for when omitted)")
}

pub fn token_parameter() -> Arg {
    Arg::new(PARAMETER_TOKEN)
        .long(PARAMETER_TOKEN)
        .num_args(1)
        .required(false)
        .env(ENV_TOKEN)
        .hide_env_values(true)
        .global(true)
        .help("API token (defaults to the token stored for the auth domain)")
}

/// No default value here: the configuration file sits between the flag and the built-in default.
pub fn api_domain_parameter() -> Arg {
    Arg::new(PARAMETER_API_DOMAIN)
        .long(PARAMETER_API_DOMAIN)
        .num_args(1)
        .required(false)
        .env(ENV_API_DOMAIN)
        .global(true)
        .help("Base URL of the provisioning API")
}

pub fn auth_domain_parameter() -> Arg {
    Arg::new(PARAMETER_AUTH_DOMAIN)
        .long(PARAMETER_AUTH_DOMAIN)
        .num_args(1)
        .required(false)
        .env(ENV_AUTH_DOMAIN)
        .global(true)
        .help("Auth domain the stored token belongs to")
}

pub fn verbose_parameter() -> Arg {
    Arg::new(PARAMETER_VERBOSE)
        .short('v')
        .long(PARAMETER_VERBOSE)
        .action(ArgAction::SetTrue)
        .global(true)
        .help("Enable verbose output for debugging")
}

pub fn debug_parameter() -> Arg {
    Arg::new(PARAMETER_DEBUG)
        .long(PARAMETER_DEBUG)
        .action(ArgAction::SetTrue)
        .global(true)
        .help("Trace requests and responses")
}

/// Every global parameter, in the order they appear in the help output.
pub fn global_parameters() -> Vec<Arg> {
    vec![
        org_parameter(),
        env_parameter(),
        token_parameter(),
        api_domain_parameter(),
        auth_domain_parameter(),
        format_parameter(),
        format_with_headers_parameter(),
        format_pretty_parameter(),
        verbose_parameter(),
        debug_parameter(),
    ]
}

/// Create a name parameter (positional).
pub fn name_parameter(help: &'static str) -> Arg {
    Arg::new(PARAMETER_NAME)
        .num_args(1)
        .required(true)
        .help(help)
}

pub fn description_parameter(help: &'static str) -> Arg {
    Arg::new(PARAMETER_DESCRIPTION)
        .long(PARAMETER_DESCRIPTION)
        .num_args(1)
        .required(false)
        .help(help)
}

pub fn asset_parameter() -> Arg {
    Arg::new(PARAMETER_ASSET)
        .long(PARAMETER_ASSET)
        .num_args(1)
        .required(false)
        .help("Asset id")
}

pub fn asset_name_parameter() -> Arg {
    Arg::new(PARAMETER_ASSET_NAME)
        .long(PARAMETER_ASSET_NAME)
        .num_args(1)
        .required(false)
        .help("Name of the new asset")
}

pub fn asset_type_parameter() -> Arg {
    Arg::new(PARAMETER_ASSET_TYPE)
        .long(PARAMETER_ASSET_TYPE)
        .num_args(1)
        .required(false)
        .help("Asset bundle identifier, e.g. aws/rds")
}

pub fn vpc_name_parameter() -> Arg {
    Arg::new(PARAMETER_VPC_NAME)
        .long(PARAMETER_VPC_NAME)
        .num_args(1)
        .required(false)
        .help("Name of the VPC to place the asset in")
}

pub fn engine_parameter() -> Arg {
    Arg::new(PARAMETER_ENGINE)
        .long(PARAMETER_ENGINE)
        .num_args(1)
        .required(false)
        .help("Database engine, e.g. postgres or mysql")
}

pub fn engine_version_parameter() -> Arg {
    Arg::new(PARAMETER_ENGINE_VERSION)
        .long(PARAMETER_ENGINE_VERSION)
        .num_args(1)
        .required(false)
        .help("Database engine version")
}

pub fn outgoing_asset_parameter() -> Arg {
    Arg::new(PARAMETER_OUTGOING_ASSET)
        .long(PARAMETER_OUTGOING_ASSET)
        .num_args(1)
        .required(false)
        .help("Asset the connection starts from")
}

pub fn incoming_asset_parameter() -> Arg {
    Arg::new(PARAMETER_INCOMING_ASSET)
        .long(PARAMETER_INCOMING_ASSET)
        .num_args(1)
        .required(false)
        .help("Asset the connection goes to")
}
