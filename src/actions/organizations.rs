use clap::ArgMatches;
use tracing::debug;

use crate::{
    actions::Session,
    commands::params::{PARAMETER_NAME, PARAMETER_ORG},
    error::CliError,
    forms,
    model::OrganizationInput,
    param_utils::optional_string,
    view::ResultView,
};

pub async fn list_organizations(session: &mut Session) -> Result<ResultView, CliError> {
    let client = session.config.client();
    let organizations = session
        .fetch("fetching organizations", move || {
            let client = client.clone();
            async move { client.list_organizations().await }
        })
        .await?;
    debug!("Found {} organizations", organizations.len());

    Ok(ResultView::Organizations(organizations))
}

/// Provision the organization named by `--org`.
pub async fn create_organization(session: &mut Session, sub_matches: &ArgMatches) -> Result<ResultView, CliError> {
    let org_id = session
        .options
        .org
        .clone()
        .ok_or_else(|| CliError::MissingRequiredArgument(format!("--{}", PARAMETER_ORG)))?;
    let name = optional_string(sub_matches, PARAMETER_NAME)
        .ok_or_else(|| CliError::MissingRequiredArgument(PARAMETER_NAME.to_string()))?;

    let client = session.config.client();
    let input = OrganizationInput::new(name);
    let organization = session
        .fetch("creating organization", move || {
            let client = client.clone();
            let org_id = org_id.clone();
            let input = input.clone();
            async move { client.create_organization(&org_id, &input).await }
        })
        .await?;

    Ok(ResultView::Organization(organization))
}

pub async fn show_organization(session: &mut Session) -> Result<ResultView, CliError> {
    let seed = session.seed();
    let result = session.resolve(&forms::organization(), seed).await?;

    let client = session.config.client();
    let organization = session
        .fetch("fetching organization", move || {
            let client = client.clone();
            let org_id = result.org.clone();
            async move { client.find_organization(&org_id).await }
        })
        .await?;

    Ok(ResultView::Organization(organization))
}
