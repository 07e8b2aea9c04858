//! CLI command definitions and argument parsing.
//!
//! This module defines all the CLI commands and their arguments using the clap crate.
//! Each resource group lives in its own file; the global options are shared
//! through [`params::global_parameters`].

use clap::{ArgMatches, Command};

pub mod asset;
pub mod config;
pub mod connection;
pub mod datastore;
pub mod environment;
pub mod network;
pub mod organization;
pub mod params;

/// The complete command tree, without parsing anything.
pub fn cli_command() -> Command {
    Command::new("cloud")
        .version(env!("CARGO_PKG_VERSION"))
        .author(env!("CARGO_PKG_AUTHORS"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .propagate_version(true)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .args(params::global_parameters())
        .subcommand(organization::organization_command())
        .subcommand(environment::environment_command())
        .subcommand(asset::asset_command())
        .subcommand(datastore::datastore_command())
        .subcommand(network::network_command())
        .subcommand(connection::connection_command())
        .subcommand(config::config_command())
}

/// Create and configure all CLI commands and parse the process arguments.
pub fn create_cli_commands() -> ArgMatches {
    cli_command().get_matches()
}
