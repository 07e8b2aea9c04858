//! Asset command definitions.

use crate::commands::params::{
    asset_name_parameter, asset_parameter, asset_type_parameter, engine_parameter, engine_version_parameter,
    vpc_name_parameter, COMMAND_ASSET, COMMAND_BUNDLE, COMMAND_CREATE, COMMAND_DESCRIBE, COMMAND_DESTROY,
    COMMAND_LIST,
};
use clap::Command;

/// Create the asset command with all its subcommands.
pub fn asset_command() -> Command {
    Command::new(COMMAND_ASSET)
        .about("Manage the assets of an environment")
        .visible_alias("a")
        .subcommand_required(true)
        .subcommand(
            Command::new(COMMAND_CREATE)
                .about("Provision a new asset")
                .visible_aliases(["c", "deploy"])
                .arg(vpc_name_parameter())
                .arg(asset_type_parameter())
                .arg(engine_parameter())
                .arg(engine_version_parameter())
                .arg(asset_name_parameter()),
        )
        .subcommand(
            Command::new(COMMAND_DESTROY)
                .about("Permanently remove an asset")
                .visible_aliases(["rm", "delete", "d", "remove"])
                .arg(asset_parameter()),
        )
        .subcommand(
            Command::new(COMMAND_LIST)
                .about("List the assets of an environment")
                .visible_alias("ls"),
        )
        .subcommand(
            Command::new(COMMAND_DESCRIBE)
                .about("Watch an asset and its operations")
                .visible_alias("show")
                .arg(asset_parameter()),
        )
        .subcommand(
            Command::new(COMMAND_BUNDLE)
                .about("List the asset bundles an environment can provision")
                .visible_alias("b"),
        )
}
