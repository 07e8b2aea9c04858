//! Environment command definitions.

use crate::commands::params::{
    description_parameter, name_parameter, COMMAND_CREATE, COMMAND_DESTROY, COMMAND_ENVIRONMENT, COMMAND_LIST,
};
use clap::Command;

/// Create the environment command with all its subcommands.
pub fn environment_command() -> Command {
    Command::new(COMMAND_ENVIRONMENT)
        .about("Manage environments of an organization")
        .visible_aliases(["env", "e"])
        .subcommand_required(true)
        .subcommand(
            Command::new(COMMAND_CREATE)
                .about("Provision a new environment")
                .arg(name_parameter("Environment name"))
                .arg(description_parameter("Environment description")),
        )
        .subcommand(
            Command::new(COMMAND_DESTROY)
                .about("Permanently remove an environment")
                .visible_aliases(["rm", "delete"]),
        )
        .subcommand(
            Command::new(COMMAND_LIST)
                .about("List the environments of an organization")
                .visible_alias("ls"),
        )
}
