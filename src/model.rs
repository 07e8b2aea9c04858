//! Data models for the provisioning API.
//!
//! These types mirror the JSON payloads exchanged with the API. Output types
//! are lenient (unknown fields are ignored, optional fields default) and
//! input types serialize exactly what the API expects.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumString};

/// Shown in place of an asset name when the asset has none
pub const UNNAMED: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_ou: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baa_status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrganizationInput {
    pub name: String,
    pub baa_status: String,
    pub aws_ou: String,
    pub contact_details: Map<String, Value>,
}

impl OrganizationInput {
    /// New organizations start with a pending BAA and no contact details.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            baa_status: "pending".to_string(),
            aws_ou: String::new(),
            contact_details: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_account_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvironmentInput {
    pub name: String,
    pub description: String,
    pub data: Map<String, Value>,
}

impl EnvironmentInput {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            data: Map::new(),
        }
    }
}

/// A kind of asset the API knows how to provision, e.g. `aws/rds`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetBundle {
    pub identifier: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetStatus {
    Requested,
    Pending,
    Deploying,
    Deployed,
    Destroying,
    Destroyed,
    #[serde(other)]
    Unknown,
}

/// Coarse health of a row, used to pick its color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Health {
    Active,
    Pending,
    Disabled,
    Neutral,
}

impl AssetStatus {
    pub fn health(&self) -> Health {
        match self {
            AssetStatus::Deployed => Health::Active,
            AssetStatus::Deploying
            | AssetStatus::Pending
            | AssetStatus::Destroying
            | AssetStatus::Requested => Health::Pending,
            AssetStatus::Destroyed => Health::Disabled,
            AssetStatus::Unknown => Health::Neutral,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetParameters {
    #[serde(default)]
    pub data: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    /// Fully qualified asset kind, `<cloud>__<type>__<version>`
    pub asset: String,
    pub status: AssetStatus,
    #[serde(default)]
    pub current_asset_parameters: AssetParameters,
}

impl Asset {
    pub fn name(&self) -> &str {
        match self.current_asset_parameters.data.get("name") {
            Some(Value::String(name)) if !name.is_empty() => name.as_str(),
            _ => UNNAMED,
        }
    }

    fn kind_part(&self, index: usize) -> &str {
        self.asset.split("__").nth(index).unwrap_or_default()
    }

    pub fn cloud(&self) -> &str {
        self.kind_part(0)
    }

    pub fn asset_type(&self) -> &str {
        self.kind_part(1)
    }

    pub fn version(&self) -> &str {
        self.kind_part(2)
    }

    pub fn is_type(&self, type_fragment: &str) -> bool {
        self.asset.contains(type_fragment)
    }
}

/// Keeps the assets whose kind contains any of the given fragments.
pub fn filter_by_type(assets: Vec<Asset>, fragments: &[&str]) -> Vec<Asset> {
    assets
        .into_iter()
        .filter(|asset| fragments.iter().any(|fragment| asset.is_type(fragment)))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetInput {
    pub asset: String,
    pub asset_version: String,
    pub asset_parameters: Map<String, Value>,
}

impl AssetInput {
    /// Input for the latest version of an AWS asset type.
    ///
    /// The type may be given as a bundle identifier (`aws/rds`) or bare (`rds`).
    pub fn aws(asset_type: &str, parameters: Map<String, Value>) -> Self {
        let asset_type = asset_type.strip_prefix("aws/").unwrap_or(asset_type);
        Self {
            asset: format!("aws__{}__latest", asset_type),
            asset_version: "latest".to_string(),
            asset_parameters: parameters,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationStatus {
    Pending,
    InProgress,
    Paused,
    Complete,
    Canceled,
    Failed,
    #[serde(other)]
    Unknown,
}

impl OperationStatus {
    pub fn health(&self) -> Health {
        match self {
            OperationStatus::Complete => Health::Active,
            OperationStatus::InProgress | OperationStatus::Paused | OperationStatus::Pending => {
                Health::Pending
            }
            OperationStatus::Canceled | OperationStatus::Failed => Health::Disabled,
            OperationStatus::Unknown => Health::Neutral,
        }
    }
}

/// A provisioning operation recorded against an asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetOperation {
    pub id: String,
    pub operation_type: String,
    pub status: OperationStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub id: String,
    #[serde(default)]
    pub description: String,
    pub outgoing_asset_id: String,
    pub incoming_asset_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionInput {
    pub description: String,
    pub outgoing_asset_id: String,
}
