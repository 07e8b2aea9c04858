//! Network command definitions.
//!
//! Networks are assets of the `vpc` family.

use crate::commands::params::{
    asset_parameter, name_parameter, COMMAND_CREATE, COMMAND_DESCRIBE, COMMAND_DESTROY, COMMAND_LIST,
    COMMAND_NETWORK,
};
use clap::Command;

pub fn network_command() -> Command {
    Command::new(COMMAND_NETWORK)
        .about("Manage networks (VPCs)")
        .visible_aliases(["vpc", "v"])
        .subcommand_required(true)
        .subcommand(
            Command::new(COMMAND_CREATE)
                .about("Provision a new VPC")
                .visible_aliases(["c", "deploy"])
                .arg(name_parameter("VPC name")),
        )
        .subcommand(
            Command::new(COMMAND_DESCRIBE)
                .about("Watch a VPC and its operations")
                .visible_alias("show")
                .arg(asset_parameter()),
        )
        .subcommand(
            Command::new(COMMAND_DESTROY)
                .about("Permanently remove a VPC")
                .visible_aliases(["rm", "delete", "d", "remove"])
                .arg(asset_parameter()),
        )
        .subcommand(
            Command::new(COMMAND_LIST)
                .about("List the VPCs of an environment")
                .visible_alias("ls"),
        )
}
