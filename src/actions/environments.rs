use clap::ArgMatches;

use crate::{
    actions::Session,
    commands::params::{PARAMETER_DESCRIPTION, PARAMETER_NAME},
    error::CliError,
    forms,
    model::EnvironmentInput,
    param_utils::optional_string,
    view::ResultView,
};

pub async fn list_environments(session: &mut Session) -> Result<ResultView, CliError> {
    let seed = session.seed();
    let result = session.resolve(&forms::organization(), seed).await?;

    let client = session.config.client();
    let environments = session
        .fetch("fetching environments", move || {
            let client = client.clone();
            let org_id = result.org.clone();
            async move { client.list_environments(&org_id).await }
        })
        .await?;

    Ok(ResultView::Environments(environments))
}

pub async fn create_environment(session: &mut Session, sub_matches: &ArgMatches) -> Result<ResultView, CliError> {
    let name = optional_string(sub_matches, PARAMETER_NAME)
        .ok_or_else(|| CliError::MissingRequiredArgument(PARAMETER_NAME.to_string()))?;
    let description = optional_string(sub_matches, PARAMETER_DESCRIPTION).unwrap_or_default();

    let seed = session.seed();
    let result = session.resolve(&forms::organization(), seed).await?;

    let client = session.config.client();
    let input = EnvironmentInput::new(name, description);
    let environment = session
        .fetch("creating environment", move || {
            let client = client.clone();
            let org_id = result.org.clone();
            let input = input.clone();
            async move { client.create_environment(&org_id, &input).await }
        })
        .await?;

    Ok(ResultView::Environment(environment))
}

/// Returns the id of the destroyed environment.
pub async fn destroy_environment(session: &mut Session) -> Result<String, CliError> {
    let seed = session.seed();
    let result = session.resolve(&forms::environment(), seed).await?;
    let env_id = result.env.clone();

    let client = session.config.client();
    session
        .fetch(format!("destroying environment {}", env_id), move || {
            let client = client.clone();
            let org_id = result.org.clone();
            let env_id = result.env.clone();
            async move { client.destroy_environment(&org_id, &env_id).await }
        })
        .await?;

    Ok(env_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        actions::testing::{matches, session},
        client::fake::{environment, organization, FakeClient},
    };

    #[tokio::test(start_paused = true)]
    async fn list_uses_the_configured_organization() {
        let (mut session, client, asked) = session(
            FakeClient {
                environments: vec![environment("e1", "staging")],
                ..Default::default()
            },
            Some("o1"),
            None,
            &[],
        );

        let view = list_environments(&mut session).await.unwrap();
        assert!(matches!(view, ResultView::Environments(ref envs) if envs.len() == 1));
        assert!(asked.lock().unwrap().is_empty());
        assert_eq!(client.calls(), vec!["list_environments"]);
    }

    #[tokio::test(start_paused = true)]
    async fn create_sends_name_and_description() {
        let (mut session, _, _) = session(FakeClient::default(), Some("o1"), None, &[]);
        let sub_matches = matches(&["cloud", "env", "create", "staging", "--description", "pre-prod"]);

        match create_environment(&mut session, &sub_matches).await.unwrap() {
            ResultView::Environment(env) => assert_eq!(env.name, "staging"),
            other => panic!("unexpected view {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn destroy_resolves_organization_then_environment() {
        let (mut session, client, asked) = session(
            FakeClient {
                organizations: vec![organization("o1", "Acme")],
                environments: vec![environment("e1", "staging")],
                ..Default::default()
            },
            None,
            None,
            &["o1", "e1"],
        );

        assert_eq!(destroy_environment(&mut session).await.unwrap(), "e1");
        assert_eq!(
            *asked.lock().unwrap(),
            vec!["Select an organization", "Select an environment"]
        );
        assert_eq!(client.calls(), vec!["destroy_environment"]);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_answer_stops_before_any_call() {
        let (mut session, client, _) = session(FakeClient::default(), None, None, &[""]);

        let error = destroy_environment(&mut session).await.unwrap_err();
        assert_eq!(error.to_string(), "You must select an organization");
        assert!(client.calls().is_empty());
    }
}
