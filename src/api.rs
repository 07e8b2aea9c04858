//! HTTP implementation of [`CloudClient`].
//!
//! Every resource lives under `/api/v1/organizations/{org}`. Environments,
//! assets and connections are nested below their owning environment, while
//! operations are listed per organization and filtered by asset.

use async_trait::async_trait;
use tracing::trace;
use url::Url;

use crate::{
    client::{ApiError, CloudClient},
    context::Settings,
    http_utils::{HttpClient, HttpRequestConfig},
    model::{
        Asset, AssetBundle, AssetInput, AssetOperation, Connection, ConnectionInput, Environment,
        EnvironmentInput, Organization, OrganizationInput,
    },
};

const API_ROOT: [&str; 2] = ["api", "v1"];
const ORGANIZATIONS: &str = "organizations";
const ENVIRONMENTS: &str = "environments";
const ASSETS: &str = "assets";

pub struct HttpCloudClient {
    http: HttpClient,
}

impl HttpCloudClient {
    pub fn new(settings: &Settings) -> Result<Self, ApiError> {
        let mut config = HttpRequestConfig::new(settings.api_domain.clone());
        config.log_bodies = settings.debug;
        if settings.token.is_none() {
            trace!("No token available, requests will be sent unauthenticated");
        }

        Ok(Self {
            http: HttpClient::new(config, settings.token.clone())?,
        })
    }

    fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let path: Vec<&str> = API_ROOT.iter().chain(segments).copied().collect();
        self.http.endpoint(&path)
    }

    fn organization(&self, org_id: &str, rest: &[&str]) -> Result<Url, ApiError> {
        let path: Vec<&str> = [ORGANIZATIONS, org_id].iter().chain(rest).copied().collect();
        self.url(&path)
    }

    fn environment(&self, org_id: &str, env_id: &str, rest: &[&str]) -> Result<Url, ApiError> {
        let path: Vec<&str> = [ENVIRONMENTS, env_id].iter().chain(rest).copied().collect();
        self.organization(org_id, &path)
    }
}

#[async_trait]
impl CloudClient for HttpCloudClient {
    async fn list_organizations(&self) -> Result<Vec<Organization>, ApiError> {
        self.http.get(self.url(&[ORGANIZATIONS])?).await
    }

    async fn create_organization(
        &self,
        org_id: &str,
        input: &OrganizationInput,
    ) -> Result<Organization, ApiError> {
        self.http.put(self.organization(org_id, &[])?, input).await
    }

    async fn find_organization(&self, org_id: &str) -> Result<Organization, ApiError> {
        self.http.get(self.organization(org_id, &[])?).await
    }

    async fn list_environments(&self, org_id: &str) -> Result<Vec<Environment>, ApiError> {
        self.http.get(self.organization(org_id, &[ENVIRONMENTS])?).await
    }

    async fn create_environment(
        &self,
        org_id: &str,
        input: &EnvironmentInput,
    ) -> Result<Environment, ApiError> {
        self.http.post(self.organization(org_id, &[ENVIRONMENTS])?, input).await
    }

    async fn destroy_environment(&self, org_id: &str, env_id: &str) -> Result<(), ApiError> {
        self.http.delete(self.environment(org_id, env_id, &[])?).await
    }

    async fn list_asset_bundles(&self, org_id: &str, env_id: &str) -> Result<Vec<AssetBundle>, ApiError> {
        self.http.get(self.environment(org_id, env_id, &["asset_bundles"])?).await
    }

    async fn create_asset(&self, org_id: &str, env_id: &str, input: &AssetInput) -> Result<Asset, ApiError> {
        self.http.post(self.environment(org_id, env_id, &[ASSETS])?, input).await
    }

    async fn list_assets(&self, org_id: &str, env_id: &str) -> Result<Vec<Asset>, ApiError> {
        self.http.get(self.environment(org_id, env_id, &[ASSETS])?).await
    }

    async fn describe_asset(&self, org_id: &str, env_id: &str, asset_id: &str) -> Result<Asset, ApiError> {
        self.http.get(self.environment(org_id, env_id, &[ASSETS, asset_id])?).await
    }

    async fn destroy_asset(&self, org_id: &str, env_id: &str, asset_id: &str) -> Result<(), ApiError> {
        self.http.delete(self.environment(org_id, env_id, &[ASSETS, asset_id])?).await
    }

    async fn list_operations_by_asset(
        &self,
        org_id: &str,
        asset_id: &str,
    ) -> Result<Vec<AssetOperation>, ApiError> {
        let mut url = self.organization(org_id, &["operations"])?;
        url.query_pairs_mut().append_pair("asset_id", asset_id);
        self.http.get(url).await
    }

    async fn create_connection(
        &self,
        org_id: &str,
        env_id: &str,
        incoming_asset_id: &str,
        input: &ConnectionInput,
    ) -> Result<Connection, ApiError> {
        let url = self.environment(org_id, env_id, &[ASSETS, incoming_asset_id, "connections"])?;
        self.http.post(url, input).await
    }
}
