use clap::ArgMatches;

use crate::{
    actions::Session,
    commands::params::{PARAMETER_DESCRIPTION, PARAMETER_INCOMING_ASSET, PARAMETER_OUTGOING_ASSET},
    error::CliError,
    forms,
    model::ConnectionInput,
    param_utils::optional_string,
    ui::pipeline::Field,
    view::ResultView,
};

pub async fn create_connection(session: &mut Session, sub_matches: &ArgMatches) -> Result<ResultView, CliError> {
    let mut seed = session.seed();
    for (field, parameter) in [
        (Field::OutgoingAsset, PARAMETER_OUTGOING_ASSET),
        (Field::IncomingAsset, PARAMETER_INCOMING_ASSET),
        (Field::Description, PARAMETER_DESCRIPTION),
    ] {
        if let Some(value) = optional_string(sub_matches, parameter) {
            seed.set(field, value);
        }
    }

    let result = session.resolve(&forms::connection_create(), seed).await?;
    let label = format!(
        "creating asset connection from (out {}) to (in {})",
        result.outgoing_asset, result.incoming_asset
    );
    let input = ConnectionInput {
        description: result.description.clone(),
        outgoing_asset_id: result.outgoing_asset.clone(),
    };

    let client = session.config.client();
    let connection = session
        .fetch(label, move || {
            let client = client.clone();
            let org_id = result.org.clone();
            let env_id = result.env.clone();
            let incoming = result.incoming_asset.clone();
            let input = input.clone();
            async move { client.create_connection(&org_id, &env_id, &incoming, &input).await }
        })
        .await?;

    Ok(ResultView::Connection(connection))
}
