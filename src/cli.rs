//! Dispatch of a parsed command line to its handler.

use clap::ArgMatches;
use tracing::{debug, trace};

use crate::{
    actions::{
        assets::{self, AssetScope},
        config, connections, environments, organizations, Session,
    },
    commands::params::{
        COMMAND_ASSET, COMMAND_BUNDLE, COMMAND_CONFIG, COMMAND_CONNECTION, COMMAND_CREATE, COMMAND_DATASTORE,
        COMMAND_DESCRIBE, COMMAND_DESTROY, COMMAND_ENVIRONMENT, COMMAND_LIST, COMMAND_NETWORK,
        COMMAND_ORGANIZATION, COMMAND_PATH, COMMAND_SET, COMMAND_SHOW,
    },
    configuration::Configuration,
    context::CloudConfig,
    error::CliError,
    format::{Formattable, OutputFormat},
    param_utils::{get_format_parameter_value, leaf_matches, CommandOptions},
    ui::{pipeline::TerminalPrompter, styles},
    view::ResultView,
};

fn extract_subcommand_name(sub_matches: &ArgMatches) -> String {
    match sub_matches.subcommand() {
        Some((name, _)) => name.to_string(),
        None => "unknown".to_string(),
    }
}

fn print_view(view: &ResultView, format: &OutputFormat) -> Result<(), CliError> {
    let output = view.format(format)?;
    println!("{}", output.trim_end());
    Ok(())
}

/// Progress notes go to stderr so they never mix with formatted output.
fn note(message: &str) {
    eprintln!("{}", styles::help(message));
}

/// Run the command described by `matches`.
pub async fn execute_command(configuration: Configuration, matches: &ArgMatches) -> Result<(), CliError> {
    let leaf = leaf_matches(matches);

    match matches.subcommand() {
        Some((COMMAND_CONFIG, sub_matches)) => execute_config_command(configuration, sub_matches, leaf),
        Some((resource, sub_matches)) => {
            let options = CommandOptions::from_matches(leaf, &configuration)?;
            trace!("Command options: {:?}", options);
            let config = CloudConfig::connect(options.settings.clone())?;
            let mut session = Session::new(options, config, Box::new(TerminalPrompter));
            execute_resource_command(&mut session, resource, sub_matches, leaf).await
        }
        None => Err(CliError::UnsupportedSubcommand(extract_subcommand_name(matches))),
    }
}

fn execute_config_command(
    mut configuration: Configuration,
    sub_matches: &ArgMatches,
    leaf: &ArgMatches,
) -> Result<(), CliError> {
    match sub_matches.subcommand() {
        Some((COMMAND_PATH, _)) => {
            println!("{}", config::configuration_path()?.display());
            Ok(())
        }
        Some((COMMAND_SHOW, _)) => {
            let format = get_format_parameter_value(leaf)?;
            println!("{}", config::show_configuration(&configuration, &format)?.trim_end());
            Ok(())
        }
        Some((COMMAND_SET, _)) => {
            config::set_configuration(&mut configuration, leaf)?;
            configuration.save_to_default()?;
            debug!("Configuration saved");
            Ok(())
        }
        _ => Err(CliError::UnsupportedSubcommand(extract_subcommand_name(sub_matches))),
    }
}

async fn execute_resource_command(
    session: &mut Session,
    resource: &str,
    sub_matches: &ArgMatches,
    leaf: &ArgMatches,
) -> Result<(), CliError> {
    let format = session.options.format.clone();
    let operation = sub_matches.subcommand_name().unwrap_or_default();
    debug!("Executing {} {}", resource, operation);

    let scope = match resource {
        COMMAND_DATASTORE => AssetScope::Datastores,
        COMMAND_NETWORK => AssetScope::Networks,
        _ => AssetScope::All,
    };

    let view = match (resource, operation) {
        (COMMAND_ORGANIZATION, COMMAND_CREATE) => organizations::create_organization(session, leaf).await?,
        (COMMAND_ORGANIZATION, COMMAND_LIST) => organizations::list_organizations(session).await?,
        (COMMAND_ORGANIZATION, COMMAND_SHOW) => organizations::show_organization(session).await?,

        (COMMAND_ENVIRONMENT, COMMAND_CREATE) => environments::create_environment(session, leaf).await?,
        (COMMAND_ENVIRONMENT, COMMAND_LIST) => environments::list_environments(session).await?,
        (COMMAND_ENVIRONMENT, COMMAND_DESTROY) => {
            let env_id = environments::destroy_environment(session).await?;
            note(&format!("Environment {} is being destroyed", env_id));
            return Ok(());
        }

        (COMMAND_ASSET | COMMAND_DATASTORE | COMMAND_NETWORK, COMMAND_LIST) => {
            assets::list_assets(session, scope).await?
        }
        (COMMAND_ASSET | COMMAND_DATASTORE | COMMAND_NETWORK, COMMAND_DESTROY) => {
            let asset_id = assets::destroy_asset(session, leaf, scope).await?;
            note(&format!("Asset {} is being destroyed", asset_id));
            return Ok(());
        }
        (COMMAND_ASSET | COMMAND_DATASTORE | COMMAND_NETWORK, COMMAND_DESCRIBE) => {
            for view in assets::describe_asset(session, leaf, scope).await? {
                print_view(&view, &format)?;
            }
            return Ok(());
        }
        (COMMAND_ASSET | COMMAND_DATASTORE, COMMAND_CREATE) => {
            let (view, hint) = assets::create_asset(session, leaf, scope).await?;
            print_view(&view, &format)?;
            note(&hint);
            return Ok(());
        }
        (COMMAND_NETWORK, COMMAND_CREATE) => {
            let (view, hint) = assets::create_network(session, leaf).await?;
            print_view(&view, &format)?;
            note(&hint);
            return Ok(());
        }
        (COMMAND_ASSET, COMMAND_BUNDLE) => assets::list_asset_bundles(session).await?,

        (COMMAND_CONNECTION, COMMAND_CREATE) => connections::create_connection(session, leaf).await?,

        _ => return Err(CliError::UnsupportedSubcommand(format!("{} {}", resource, operation))),
    };

    print_view(&view, &format)
}
