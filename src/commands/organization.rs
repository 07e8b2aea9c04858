//! Organization command definitions.

use crate::commands::params::{name_parameter, COMMAND_CREATE, COMMAND_LIST, COMMAND_ORGANIZATION, COMMAND_SHOW};
use clap::Command;

/// Create the organization command with all its subcommands.
pub fn organization_command() -> Command {
    Command::new(COMMAND_ORGANIZATION)
        .about("Manage organizations")
        .visible_aliases(["org", "o"])
        .subcommand_required(true)
        .subcommand(
            Command::new(COMMAND_CREATE)
                .about("Provision the organization given by --org")
                .arg(name_parameter("Organization name")),
        )
        .subcommand(
            Command::new(COMMAND_LIST)
                .about("List all organizations you can access")
                .visible_alias("ls"),
        )
        .subcommand(Command::new(COMMAND_SHOW).about("Show one organization"))
}
