//! Handlers shared by the asset, datastore and network commands.

use clap::ArgMatches;
use serde_json::{Map, Value};
use tracing::debug;

use crate::{
    actions::Session,
    commands::params::{
        PARAMETER_ASSET, PARAMETER_ASSET_NAME, PARAMETER_ASSET_TYPE, PARAMETER_ENGINE, PARAMETER_ENGINE_VERSION,
        PARAMETER_NAME, PARAMETER_VPC_NAME,
    },
    error::CliError,
    forms::{self, DATASTORE_TYPE, NETWORK_TYPE},
    model::{filter_by_type, Asset, AssetInput},
    param_utils::optional_string,
    ui::{
        detail,
        fetch::Outcome,
        pipeline::{Field, FormResult, Pipeline},
    },
    view::ResultView,
};

/// The assets a command works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetScope {
    All,
    Datastores,
    Networks,
}

impl AssetScope {
    fn types(self) -> &'static [&'static str] {
        match self {
            AssetScope::All => &[],
            AssetScope::Datastores => &[DATASTORE_TYPE],
            AssetScope::Networks => &[NETWORK_TYPE],
        }
    }

    /// Picks one asset of the scope.
    fn pipeline(self) -> Pipeline {
        match self {
            AssetScope::All => forms::asset(),
            AssetScope::Datastores => forms::datastore(),
            AssetScope::Networks => forms::network(),
        }
    }

    fn noun(self) -> &'static str {
        match self {
            AssetScope::All => "assets",
            AssetScope::Datastores => "datastores",
            AssetScope::Networks => "vpcs",
        }
    }
}

/// The seed plus `--asset`, when given.
fn asset_seed(session: &Session, sub_matches: &ArgMatches) -> FormResult {
    let mut seed = session.seed();
    if let Some(asset) = optional_string(sub_matches, PARAMETER_ASSET) {
        seed.set(Field::Asset, asset);
    }
    seed
}

pub async fn list_assets(session: &mut Session, scope: AssetScope) -> Result<ResultView, CliError> {
    let seed = session.seed();
    let result = session.resolve(&forms::environment(), seed).await?;

    let client = session.config.client();
    let assets = session
        .fetch(format!("fetching {}", scope.noun()), move || {
            let client = client.clone();
            let org_id = result.org.clone();
            let env_id = result.env.clone();
            async move { client.list_assets(&org_id, &env_id).await }
        })
        .await?;

    let assets = match scope.types() {
        [] => assets,
        types => filter_by_type(assets, types),
    };
    debug!("Found {} {}", assets.len(), scope.noun());

    Ok(ResultView::Assets(assets))
}

pub async fn list_asset_bundles(session: &mut Session) -> Result<ResultView, CliError> {
    let seed = session.seed();
    let result = session.resolve(&forms::environment(), seed).await?;

    let client = session.config.client();
    let bundles = session
        .fetch("fetching asset bundles", move || {
            let client = client.clone();
            let org_id = result.org.clone();
            let env_id = result.env.clone();
            async move { client.list_asset_bundles(&org_id, &env_id).await }
        })
        .await?;

    Ok(ResultView::AssetBundles(bundles))
}

/// Parameters the API expects for a new asset. Empty values are left out.
fn asset_parameters(result: &FormResult) -> Map<String, Value> {
    [
        ("name", &result.asset_name),
        ("engine", &result.engine),
        ("engine_version", &result.engine_version),
        ("vpc_name", &result.vpc_name),
    ]
    .into_iter()
    .filter(|(_, value)| !value.is_empty())
    .map(|(key, value)| (key.to_string(), Value::String(value.clone())))
    .collect()
}

async fn submit_asset(session: &Session, result: &FormResult, input: AssetInput) -> Result<Asset, CliError> {
    let client = session.config.client();
    let org_id = result.org.clone();
    let env_id = result.env.clone();
    let label = format!("creating {}", input.asset);
    session
        .fetch(label, move || {
            let client = client.clone();
            let org_id = org_id.clone();
            let env_id = env_id.clone();
            let input = input.clone();
            async move { client.create_asset(&org_id, &env_id, &input).await }
        })
        .await
}

/// How to follow a newly created asset.
pub fn describe_hint(org_id: &str, env_id: &str, asset_id: &str) -> String {
    format!(
        "View the asset's provisioning progress with: cloud asset describe --org {} --env {} --asset {}",
        org_id, env_id, asset_id
    )
}

/// Returns the new asset and a hint for following its provisioning.
pub async fn create_asset(
    session: &mut Session,
    sub_matches: &ArgMatches,
    scope: AssetScope,
) -> Result<(ResultView, String), CliError> {
    let mut seed = session.seed();
    if scope == AssetScope::Datastores {
        seed.set(Field::AssetType, DATASTORE_TYPE);
    }
    for (field, parameter) in [
        (Field::AssetType, PARAMETER_ASSET_TYPE),
        (Field::AssetName, PARAMETER_ASSET_NAME),
        (Field::VpcName, PARAMETER_VPC_NAME),
        (Field::Engine, PARAMETER_ENGINE),
        (Field::EngineVersion, PARAMETER_ENGINE_VERSION),
    ] {
        if let Some(value) = optional_string(sub_matches, parameter) {
            seed.set(field, value);
        }
    }

    let result = session.resolve(&forms::asset_create(), seed).await?;
    let input = AssetInput::aws(&result.asset_type, asset_parameters(&result));
    let asset = submit_asset(session, &result, input).await?;

    let hint = describe_hint(&result.org, &result.env, &asset.id);
    Ok((ResultView::Asset(asset), hint))
}

/// Provision a VPC named by the positional argument.
pub async fn create_network(session: &mut Session, sub_matches: &ArgMatches) -> Result<(ResultView, String), CliError> {
    let name = optional_string(sub_matches, PARAMETER_NAME)
        .ok_or_else(|| CliError::MissingRequiredArgument(PARAMETER_NAME.to_string()))?;

    let seed = session.seed();
    let result = session.resolve(&forms::environment(), seed).await?;
    let mut parameters = Map::new();
    parameters.insert("name".to_string(), Value::String(name));
    let asset = submit_asset(session, &result, AssetInput::aws(NETWORK_TYPE, parameters)).await?;

    let hint = describe_hint(&result.org, &result.env, &asset.id);
    Ok((ResultView::Asset(asset), hint))
}

/// Returns the id of the destroyed asset.
pub async fn destroy_asset(session: &mut Session, sub_matches: &ArgMatches, scope: AssetScope) -> Result<String, CliError> {
    let seed = asset_seed(session, sub_matches);
    let result = session.resolve(&scope.pipeline(), seed).await?;
    let asset_id = result.asset.clone();

    let client = session.config.client();
    session
        .fetch(format!("destroying asset {}", asset_id), move || {
            let client = client.clone();
            let org_id = result.org.clone();
            let env_id = result.env.clone();
            let asset_id = result.asset.clone();
            async move { client.destroy_asset(&org_id, &env_id, &asset_id).await }
        })
        .await?;

    Ok(asset_id)
}

/// Show the asset and follow its operations on the terminal.
///
/// Without an interactive terminal the asset and its operations are returned
/// for printing instead.
pub async fn describe_asset(
    session: &mut Session,
    sub_matches: &ArgMatches,
    scope: AssetScope,
) -> Result<Vec<ResultView>, CliError> {
    let seed = asset_seed(session, sub_matches);
    let result = session.resolve(&scope.pipeline(), seed).await?;
    let org_id = result.org.clone();

    let client = session.config.client();
    let asset = session
        .fetch("fetching asset", move || {
            let client = client.clone();
            let org_id = result.org.clone();
            let env_id = result.env.clone();
            let asset_id = result.asset.clone();
            async move { client.describe_asset(&org_id, &env_id, &asset_id).await }
        })
        .await?;

    if !session.options.mode.is_interactive() {
        let operations = list_operations(session, &org_id, &asset.id).await?;
        return Ok(vec![ResultView::Asset(asset), operations]);
    }

    match detail::run(&session.config, &org_id, asset, session.options.mode).await? {
        Outcome::Failed(error) => Err(CliError::Api(error)),
        Outcome::Succeeded(()) | Outcome::Cancelled => Ok(Vec::new()),
    }
}

async fn list_operations(session: &Session, org_id: &str, asset_id: &str) -> Result<ResultView, CliError> {
    let client = session.config.client();
    let org_id = org_id.to_string();
    let asset_id = asset_id.to_string();
    let operations = session
        .fetch("fetching operations", move || {
            let client = client.clone();
            let org_id = org_id.clone();
            let asset_id = asset_id.clone();
            async move { client.list_operations_by_asset(&org_id, &asset_id).await }
        })
        .await?;

    Ok(ResultView::Operations(operations))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        actions::testing::{matches, session},
        client::{
            fake::{asset, FakeClient},
            ApiError,
        },
    };

    fn assets() -> Vec<Asset> {
        vec![
            asset("a1", "aws__vpc__latest", "main"),
            asset("a2", "aws__rds__latest", "db"),
        ]
    }

    #[tokio::test(start_paused = true)]
    async fn list_filters_by_scope() {
        let (mut session, _, _) = session(
            FakeClient {
                assets: assets(),
                ..Default::default()
            },
            Some("o1"),
            Some("e1"),
            &[],
        );

        let all = list_assets(&mut session, AssetScope::All).await.unwrap();
        assert!(matches!(all, ResultView::Assets(ref assets) if assets.len() == 2));

        match list_assets(&mut session, AssetScope::Datastores).await.unwrap() {
            ResultView::Assets(assets) => {
                assert_eq!(assets.len(), 1);
                assert_eq!(assets[0].id, "a2");
            }
            other => panic!("unexpected view {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn flags_skip_their_prompts() {
        let (mut session, client, asked) = session(FakeClient::default(), Some("o1"), Some("e1"), &["db"]);
        let sub_matches = matches(&[
            "cloud",
            "asset",
            "create",
            "--vpc-name",
            "main",
            "--asset-type",
            "aws/rds",
            "--engine",
            "postgres",
            "--engine-version",
            "14",
        ]);

        let (view, hint) = create_asset(&mut session, &sub_matches, AssetScope::All).await.unwrap();

        assert_eq!(*asked.lock().unwrap(), vec!["What do you want to call the asset?"]);
        assert_eq!(client.calls(), vec!["create_asset"]);
        match view {
            ResultView::Asset(asset) => {
                assert_eq!(asset.asset, "aws__rds__latest");
                assert_eq!(asset.name(), "db");
            }
            other => panic!("unexpected view {:?}", other),
        }
        assert!(hint.ends_with("cloud asset describe --org o1 --env e1 --asset asset-new"));
    }

    #[tokio::test(start_paused = true)]
    async fn datastore_creation_does_not_ask_for_a_type() {
        let (mut session, _, asked) =
            session(FakeClient::default(), Some("o1"), Some("e1"), &["main", "mysql", "8.0", "orders"]);
        let sub_matches = matches(&["cloud", "datastore", "create"]);

        let (view, _) = create_asset(&mut session, &sub_matches, AssetScope::Datastores).await.unwrap();

        assert_eq!(
            *asked.lock().unwrap(),
            vec![
                "Select a VPC",
                "Select an engine",
                "Select an engine version",
                "What do you want to call the asset?",
            ]
        );
        assert!(matches!(view, ResultView::Asset(ref asset) if asset.asset == "aws__rds__latest"));
    }

    #[test]
    fn empty_parameters_are_left_out() {
        let result = FormResult {
            asset_name: "db".into(),
            engine: "postgres".into(),
            ..Default::default()
        };
        let parameters = asset_parameters(&result);

        assert_eq!(parameters.len(), 2);
        assert_eq!(parameters.get("engine"), Some(&Value::String("postgres".into())));
        assert!(!parameters.contains_key("vpc_name"));
    }

    #[tokio::test(start_paused = true)]
    async fn network_creation_uses_the_vpc_bundle() {
        let (mut session, _, _) = session(FakeClient::default(), Some("o1"), Some("e1"), &[]);
        let sub_matches = matches(&["cloud", "network", "create", "edge"]);

        match create_network(&mut session, &sub_matches).await.unwrap().0 {
            ResultView::Asset(asset) => {
                assert_eq!(asset.asset, "aws__vpc__latest");
                assert_eq!(asset.name(), "edge");
            }
            other => panic!("unexpected view {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn destroy_takes_the_asset_flag() {
        let (mut session, client, asked) = session(FakeClient::default(), Some("o1"), Some("e1"), &[]);
        let sub_matches = matches(&["cloud", "asset", "destroy", "--asset", "a7"]);

        assert_eq!(destroy_asset(&mut session, &sub_matches, AssetScope::All).await.unwrap(), "a7");
        assert!(asked.lock().unwrap().is_empty());
        assert_eq!(client.calls(), vec!["destroy_asset"]);
    }

    #[tokio::test(start_paused = true)]
    async fn headless_describe_returns_the_asset() {
        let (mut session, _, _) = session(
            FakeClient {
                assets: assets(),
                ..Default::default()
            },
            Some("o1"),
            Some("e1"),
            &["a2"],
        );
        let sub_matches = matches(&["cloud", "ds", "describe"]);

        let views = describe_asset(&mut session, &sub_matches, AssetScope::Datastores).await.unwrap();
        assert_eq!(views.len(), 2);
        assert!(matches!(views[0], ResultView::Asset(ref asset) if asset.id == "a2"));
        assert!(matches!(views[1], ResultView::Operations(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn backend_failure_is_reported() {
        let (mut session, _, _) = session(
            FakeClient {
                failure: Some(500),
                ..Default::default()
            },
            Some("o1"),
            Some("e1"),
            &[],
        );

        let error = list_assets(&mut session, AssetScope::All).await.unwrap_err();
        assert!(matches!(error, CliError::Api(ApiError::UnexpectedStatus { status: 500, .. })));
    }
}
