//! Configuration command definitions.
//!
//! `config set` stores defaults for the global options; it reads the same
//! `--org`, `--env`, `--api-domain` and `--auth-domain` flags every command accepts.

use crate::commands::params::{COMMAND_CONFIG, COMMAND_PATH, COMMAND_SET, COMMAND_SHOW};
use clap::Command;

/// Create the config command with all its subcommands.
pub fn config_command() -> Command {
    Command::new(COMMAND_CONFIG)
        .about("Configuration management")
        .subcommand_required(true)
        .subcommand(Command::new(COMMAND_PATH).about("Show configuration file path"))
        .subcommand(
            Command::new(COMMAND_SHOW)
                .about("Show the stored configuration")
                .visible_alias("get"),
        )
        .subcommand(
            Command::new(COMMAND_SET)
                .about("Store --org, --env, --api-domain or --auth-domain as defaults"),
        )
}
