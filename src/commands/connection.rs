//! Connection command definitions.

use crate::commands::params::{
    description_parameter, incoming_asset_parameter, outgoing_asset_parameter, COMMAND_CONNECTION, COMMAND_CREATE,
};
use clap::Command;

pub fn connection_command() -> Command {
    Command::new(COMMAND_CONNECTION)
        .about("Manage connections between assets")
        .visible_aliases(["conn", "c"])
        .subcommand_required(true)
        .subcommand(
            Command::new(COMMAND_CREATE)
                .about("Connect one asset to another")
                .arg(outgoing_asset_parameter())
                .arg(incoming_asset_parameter())
                .arg(description_parameter("Connection description")),
        )
}
