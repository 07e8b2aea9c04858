//! Datastore command definitions.
//!
//! Datastores are assets of the `rds` family.

use crate::commands::params::{
    asset_name_parameter, asset_parameter, engine_parameter, engine_version_parameter, vpc_name_parameter,
    COMMAND_CREATE, COMMAND_DATASTORE, COMMAND_DESCRIBE, COMMAND_DESTROY, COMMAND_LIST,
};
use clap::Command;

pub fn datastore_command() -> Command {
    Command::new(COMMAND_DATASTORE)
        .about("Manage datastores")
        .visible_aliases(["ds", "database", "db", "rds"])
        .subcommand_required(true)
        .subcommand(
            Command::new(COMMAND_CREATE)
                .about("Provision a new datastore")
                .visible_aliases(["c", "deploy"])
                .arg(vpc_name_parameter())
                .arg(engine_parameter())
                .arg(engine_version_parameter())
                .arg(asset_name_parameter()),
        )
        .subcommand(
            Command::new(COMMAND_DESCRIBE)
                .about("Watch a datastore and its operations")
                .visible_alias("show")
                .arg(asset_parameter()),
        )
        .subcommand(
            Command::new(COMMAND_DESTROY)
                .about("Permanently remove a datastore")
                .visible_aliases(["rm", "delete", "d", "remove"])
                .arg(asset_parameter()),
        )
        .subcommand(
            Command::new(COMMAND_LIST)
                .about("List the datastores of an environment")
                .visible_alias("ls"),
        )
}
