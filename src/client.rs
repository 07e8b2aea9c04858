//! Abstraction over the provisioning API.
//!
//! Everything that talks to the backend goes through [`CloudClient`], so the
//! interactive layers can be exercised against an in-process implementation.

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{
    Asset, AssetBundle, AssetInput, AssetOperation, Connection, ConnectionInput, Environment,
    EnvironmentInput, Organization, OrganizationInput,
};

/// Error emitted by the provisioning API client
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("request failed with status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },
}

#[async_trait]
pub trait CloudClient: Send + Sync {
    async fn list_organizations(&self) -> Result<Vec<Organization>, ApiError>;

    /// Creates (or replaces) the organization with the given identifier.
    async fn create_organization(
        &self,
        org_id: &str,
        input: &OrganizationInput,
    ) -> Result<Organization, ApiError>;

    async fn find_organization(&self, org_id: &str) -> Result<Organization, ApiError>;

    async fn list_environments(&self, org_id: &str) -> Result<Vec<Environment>, ApiError>;

    async fn create_environment(
        &self,
        org_id: &str,
        input: &EnvironmentInput,
    ) -> Result<Environment, ApiError>;

    async fn destroy_environment(&self, org_id: &str, env_id: &str) -> Result<(), ApiError>;

    async fn list_asset_bundles(&self, org_id: &str, env_id: &str) -> Result<Vec<AssetBundle>, ApiError>;

    async fn create_asset(&self, org_id: &str, env_id: &str, input: &AssetInput) -> Result<Asset, ApiError>;

    async fn list_assets(&self, org_id: &str, env_id: &str) -> Result<Vec<Asset>, ApiError>;

    async fn describe_asset(&self, org_id: &str, env_id: &str, asset_id: &str) -> Result<Asset, ApiError>;

    async fn destroy_asset(&self, org_id: &str, env_id: &str, asset_id: &str) -> Result<(), ApiError>;

    async fn list_operations_by_asset(
        &self,
        org_id: &str,
        asset_id: &str,
    ) -> Result<Vec<AssetOperation>, ApiError>;

    /// Connects the outgoing asset named in `input` to `incoming_asset_id`.
    async fn create_connection(
        &self,
        org_id: &str,
        env_id: &str,
        incoming_asset_id: &str,
        input: &ConnectionInput,
    ) -> Result<Connection, ApiError>;
}
