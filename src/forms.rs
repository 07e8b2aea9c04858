//! Field steps and pipelines for the provisioning resources.
//!
//! Each step knows how to ask for one value and which message to report when
//! the user leaves it empty. Commands combine them into pipelines.

use crate::{
    client::ApiError,
    context::CloudConfig,
    model::{filter_by_type, Asset},
    ui::{
        form::{FormField, FormOption, OptionsLoader},
        pipeline::{Field, FormResult, Pipeline, Step},
    },
};

pub const ENGINE_POSTGRES: &str = "postgres";
pub const ENGINE_MYSQL: &str = "mysql";

/// Type fragment of datastore assets
pub const DATASTORE_TYPE: &str = "rds";
/// Type fragment of network assets
pub const NETWORK_TYPE: &str = "vpc";

/// Versions offered for each supported engine.
pub fn engine_versions(engine: &str) -> &'static [&'static str] {
    match engine {
        ENGINE_POSTGRES => &["13", "14"],
        ENGINE_MYSQL => &["8.0", "5.7"],
        _ => &[],
    }
}

fn plain_options(values: &[&str]) -> Vec<FormOption> {
    values.iter().map(|value| FormOption::new(*value, *value)).collect()
}

/// Assets of the result's environment, labelled by name.
///
/// An empty `types` list keeps every asset.
fn asset_options(result: &FormResult, types: &'static [&'static str]) -> OptionsLoader {
    let org = result.org.clone();
    let env = result.env.clone();
    OptionsLoader::new(move |config: CloudConfig| {
        let org = org.clone();
        let env = env.clone();
        async move {
            let mut assets = config.client().list_assets(&org, &env).await?;
            if !types.is_empty() {
                assets = filter_by_type(assets, types);
            }
            Ok::<_, ApiError>(assets.iter().map(asset_option).collect())
        }
    })
}

fn asset_option(asset: &Asset) -> FormOption {
    FormOption::new(asset.name(), asset.id.clone())
}

fn organization_field(_: &FormResult) -> FormField {
    FormField::select(
        "Select an organization",
        OptionsLoader::new(|config: CloudConfig| async move {
            let organizations = config.client().list_organizations().await?;
            Ok::<_, ApiError>(organizations
                .into_iter()
                .map(|org| FormOption::new(org.name, org.id))
                .collect())
        }),
    )
}

fn environment_field(result: &FormResult) -> FormField {
    let org = result.org.clone();
    FormField::select(
        "Select an environment",
        OptionsLoader::new(move |config: CloudConfig| {
            let org = org.clone();
            async move {
                let environments = config.client().list_environments(&org).await?;
                Ok::<_, ApiError>(environments
                    .into_iter()
                    .map(|env| FormOption::new(env.name, env.id))
                    .collect())
            }
        }),
    )
}

fn asset_field(result: &FormResult) -> FormField {
    FormField::select("Select an asset", asset_options(result, &[]))
}

fn datastore_field(result: &FormResult) -> FormField {
    FormField::select("Select a datastore", asset_options(result, &[DATASTORE_TYPE]))
}

fn network_field(result: &FormResult) -> FormField {
    FormField::select("Select a VPC", asset_options(result, &[NETWORK_TYPE]))
}

fn outgoing_asset_field(result: &FormResult) -> FormField {
    FormField::select("Select an outgoing asset (from)", asset_options(result, &[]))
}

fn incoming_asset_field(result: &FormResult) -> FormField {
    FormField::select("Select an incoming asset (to)", asset_options(result, &[]))
}

fn vpc_field(result: &FormResult) -> FormField {
    let org = result.org.clone();
    let env = result.env.clone();
    FormField::select(
        "Select a VPC",
        OptionsLoader::new(move |config: CloudConfig| {
            let org = org.clone();
            let env = env.clone();
            async move {
                let assets = config.client().list_assets(&org, &env).await?;
                Ok::<_, ApiError>(filter_by_type(assets, &[NETWORK_TYPE])
                    .iter()
                    .map(|vpc| FormOption::new(vpc.name(), vpc.name()))
                    .collect())
            }
        }),
    )
}

fn asset_type_field(result: &FormResult) -> FormField {
    let org = result.org.clone();
    let env = result.env.clone();
    FormField::select(
        "Select an asset type",
        OptionsLoader::new(move |config: CloudConfig| {
            let org = org.clone();
            let env = env.clone();
            async move {
                let bundles = config.client().list_asset_bundles(&org, &env).await?;
                Ok::<_, ApiError>(bundles
                    .into_iter()
                    .map(|bundle| FormOption::new(bundle.name, bundle.identifier))
                    .collect())
            }
        }),
    )
}

fn engine_field(_: &FormResult) -> FormField {
    FormField::select(
        "Select an engine",
        OptionsLoader::fixed(plain_options(&[ENGINE_POSTGRES, ENGINE_MYSQL])),
    )
}

fn engine_version_field(result: &FormResult) -> FormField {
    FormField::select(
        "Select an engine version",
        OptionsLoader::fixed(plain_options(engine_versions(&result.engine))),
    )
}

fn asset_name_field(_: &FormResult) -> FormField {
    FormField::input("What do you want to call the asset?")
}

fn description_field(_: &FormResult) -> FormField {
    FormField::input("Describe the asset connection")
}

pub const ORGANIZATION: Step = Step::new(Field::Org, "You must select an organization", organization_field);
pub const ENVIRONMENT: Step = Step::new(Field::Env, "You must select an environment", environment_field);
pub const ASSET: Step = Step::new(Field::Asset, "You must select an asset", asset_field);
pub const DATASTORE: Step = Step::new(Field::Asset, "You must select a datastore", datastore_field);
pub const NETWORK: Step = Step::new(Field::Asset, "You must select a VPC", network_field);
pub const ASSET_TYPE: Step = Step::new(Field::AssetType, "You must enter a type for your asset", asset_type_field);
pub const ASSET_NAME: Step = Step::new(Field::AssetName, "You must enter a name for your asset", asset_name_field);
pub const VPC_NAME: Step = Step::new(Field::VpcName, "You must enter a vpc for your asset", vpc_field);
pub const ENGINE: Step = Step::new(Field::Engine, "You must select an engine for your asset", engine_field);
pub const ENGINE_VERSION: Step = Step::new(
    Field::EngineVersion,
    "You must select an engine version for your asset",
    engine_version_field,
);
pub const OUTGOING_ASSET: Step = Step::new(
    Field::OutgoingAsset,
    "You must select an outgoing asset in order to create a connection",
    outgoing_asset_field,
);
pub const INCOMING_ASSET: Step = Step::new(
    Field::IncomingAsset,
    "You must select an incoming asset in order to create a connection",
    incoming_asset_field,
);
pub const DESCRIPTION: Step = Step::new(
    Field::Description,
    "You must enter a description for the asset connection",
    description_field,
);

pub fn organization() -> Pipeline {
    Pipeline::new([ORGANIZATION])
}

pub fn environment() -> Pipeline {
    Pipeline::new([ORGANIZATION, ENVIRONMENT])
}

/// Picks an existing asset of an environment.
pub fn asset() -> Pipeline {
    Pipeline::new([ORGANIZATION, ENVIRONMENT, ASSET])
}

pub fn datastore() -> Pipeline {
    Pipeline::new([ORGANIZATION, ENVIRONMENT, DATASTORE])
}

pub fn network() -> Pipeline {
    Pipeline::new([ORGANIZATION, ENVIRONMENT, NETWORK])
}

pub fn asset_create() -> Pipeline {
    Pipeline::new([
        ORGANIZATION,
        ENVIRONMENT,
        VPC_NAME,
        ASSET_TYPE,
        ENGINE,
        ENGINE_VERSION,
        ASSET_NAME,
    ])
}

pub fn connection_create() -> Pipeline {
    Pipeline::new([ORGANIZATION, ENVIRONMENT, OUTGOING_ASSET, INCOMING_ASSET, DESCRIPTION])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        client::fake::{asset as fake_asset, environment, organization, FakeClient},
        context::testing::config_with,
        model::AssetBundle,
    };

    async fn options_of(field: FormField, config: &CloudConfig) -> Vec<FormOption> {
        match field {
            FormField::SingleSelect { options, .. } => options.load(config.clone()).await.unwrap(),
            FormField::TextInput { title } => panic!("'{}' is not a select field", title),
        }
    }

    fn scoped() -> FormResult {
        FormResult {
            org: "org-1".into(),
            env: "env-1".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn organizations_are_labelled_by_name() {
        let (config, _) = config_with(FakeClient {
            organizations: vec![organization("org-1", "Acme"), organization("org-2", "Initech")],
            ..Default::default()
        });

        let options = options_of(organization_field(&FormResult::default()), &config).await;
        assert_eq!(options, vec![FormOption::new("Acme", "org-1"), FormOption::new("Initech", "org-2")]);
    }

    #[tokio::test]
    async fn environments_are_listed_for_the_selected_organization() {
        let (config, client) = config_with(FakeClient {
            environments: vec![environment("env-1", "production")],
            ..Default::default()
        });

        let options = options_of(environment_field(&scoped()), &config).await;
        assert_eq!(options, vec![FormOption::new("production", "env-1")]);
        assert_eq!(client.calls(), vec!["list_environments"]);
    }

    #[tokio::test]
    async fn vpc_options_only_include_vpcs() {
        let (config, _) = config_with(FakeClient {
            assets: vec![
                fake_asset("a1", "aws__vpc__latest", "main"),
                fake_asset("a2", "aws__rds__latest", "db"),
            ],
            ..Default::default()
        });

        let options = options_of(vpc_field(&scoped()), &config).await;
        assert_eq!(options, vec![FormOption::new("main", "main")]);
    }

    #[tokio::test]
    async fn datastore_picker_hides_other_assets() {
        let (config, _) = config_with(FakeClient {
            assets: vec![
                fake_asset("a1", "aws__vpc__latest", "main"),
                fake_asset("a2", "aws__rds__latest", "db"),
            ],
            ..Default::default()
        });

        let options = options_of(datastore_field(&scoped()), &config).await;
        assert_eq!(options, vec![FormOption::new("db", "a2")]);

        let options = options_of(asset_field(&scoped()), &config).await;
        assert_eq!(options.len(), 2);
    }

    #[tokio::test]
    async fn asset_types_come_from_bundles() {
        let (config, _) = config_with(FakeClient {
            bundles: vec![AssetBundle {
                identifier: "aws/rds".into(),
                name: "Database".into(),
                description: String::new(),
            }],
            ..Default::default()
        });

        let options = options_of(asset_type_field(&scoped()), &config).await;
        assert_eq!(options, vec![FormOption::new("Database", "aws/rds")]);
    }

    #[tokio::test]
    async fn engine_versions_follow_the_engine() {
        let (config, _) = config_with(FakeClient::default());
        let mut result = scoped();
        result.engine = ENGINE_MYSQL.into();

        let options = options_of(engine_version_field(&result), &config).await;
        assert_eq!(options, vec![FormOption::new("8.0", "8.0"), FormOption::new("5.7", "5.7")]);
        assert!(engine_versions("oracle").is_empty());
    }

    #[test]
    fn asset_creation_asks_for_everything_it_submits() {
        assert_eq!(
            asset_create().fields(),
            vec![
                Field::Org,
                Field::Env,
                Field::VpcName,
                Field::AssetType,
                Field::Engine,
                Field::EngineVersion,
                Field::AssetName,
            ]
        );
        assert_eq!(connection_create().fields().last(), Some(&Field::Description));
    }
}
