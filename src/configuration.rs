use crate::format::{to_json, Cell, Formattable, FormattingError, OutputFormat, Table};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};
use tracing::debug;

pub const DEFAULT_APPLICATION_ID: &str = "cloud-cli";
pub const DEFAULT_CONFIGURATION_FILE_NAME: &str = "config.yml";
pub const CONFIG_DIR_ENV: &str = "CLOUD_CLI_CONFIG_DIR";

pub const DEFAULT_API_DOMAIN: &str = "https://cloud-api.aptible.com";
pub const DEFAULT_AUTH_DOMAIN: &str = "https://auth.aptible.com";

#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("failed to resolve the configuration directory")]
    FailedToFindConfigurationDirectory,
    #[error("failed to load configuration data, because of: {cause}")]
    FailedToLoadData {
        cause: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("failed to write configuration data to file, because of: {cause}")]
    FailedToWriteData {
        cause: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("invalid value for property {name:?}: {value}")]
    InvalidPropertyValue { name: String, value: String },
}

/// Persistent defaults for the global options.
///
/// Every property is optional; flags and environment variables take
/// precedence over what is stored here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    api_domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    auth_domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    org: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    env: Option<String>,
}

impl Configuration {
    pub fn api_domain(&self) -> Option<&str> {
        self.api_domain.as_deref()
    }

    pub fn auth_domain(&self) -> Option<&str> {
        self.auth_domain.as_deref()
    }

    pub fn org(&self) -> Option<&str> {
        self.org.as_deref()
    }

    pub fn env(&self) -> Option<&str> {
        self.env.as_deref()
    }

    pub fn set_api_domain(&mut self, value: impl Into<String>) -> Result<(), ConfigurationError> {
        let value = value.into();
        if url::Url::parse(&value).is_err() {
            return Err(ConfigurationError::InvalidPropertyValue {
                name: "api_domain".to_string(),
                value,
            });
        }
        self.api_domain = Some(value);
        Ok(())
    }

    pub fn set_auth_domain(&mut self, value: impl Into<String>) {
        self.auth_domain = Some(value.into());
    }

    pub fn set_org(&mut self, value: impl Into<String>) {
        self.org = Some(value.into());
    }

    pub fn set_env(&mut self, value: impl Into<String>) {
        self.env = Some(value.into());
    }

    pub fn get_default_configuration_file_path() -> Result<PathBuf, ConfigurationError> {
        if let Ok(config_dir_str) = std::env::var(CONFIG_DIR_ENV) {
            let mut config_path = PathBuf::from(config_dir_str);
            config_path.push(DEFAULT_CONFIGURATION_FILE_NAME);
            return Ok(config_path);
        }

        match config_dir() {
            Some(mut default_config_file_path) => {
                default_config_file_path.push(DEFAULT_APPLICATION_ID);
                default_config_file_path.push(DEFAULT_CONFIGURATION_FILE_NAME);
                Ok(default_config_file_path)
            }
            None => Err(ConfigurationError::FailedToFindConfigurationDirectory),
        }
    }

    /// Load the default configuration, or an empty one when no file exists yet.
    pub fn load_default_if_present() -> Result<Configuration, ConfigurationError> {
        let default_file_path = Configuration::get_default_configuration_file_path()?;
        if !default_file_path.exists() {
            debug!("No configuration file at {}", default_file_path.display());
            return Ok(Configuration::default());
        }
        Configuration::load_from_file(&default_file_path)
    }

    pub fn load_from_file(path: &Path) -> Result<Configuration, ConfigurationError> {
        let configuration = fs::read_to_string(path)
            .map_err(|cause| ConfigurationError::FailedToLoadData { cause: Box::new(cause) })?;

        // an empty file is an empty configuration
        if configuration.trim().is_empty() {
            return Ok(Configuration::default());
        }

        serde_yaml::from_str(&configuration)
            .map_err(|cause| ConfigurationError::FailedToLoadData { cause: Box::new(cause) })
    }

    pub fn write<W: Write>(&self, writer: W) -> Result<(), ConfigurationError> {
        serde_yaml::to_writer(writer, self)
            .map_err(|e| ConfigurationError::FailedToWriteData { cause: Box::new(e) })
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigurationError> {
        // first check if the parent directory exists and try to create it if not
        match path.parent() {
            Some(directory) => fs::create_dir_all(directory)
                .map_err(|_| ConfigurationError::FailedToFindConfigurationDirectory)?,
            None => return Err(ConfigurationError::FailedToFindConfigurationDirectory),
        }

        let file = File::create(path)
            .map_err(|e| ConfigurationError::FailedToWriteData { cause: Box::new(e) })?;
        self.write(file)
    }

    pub fn save_to_default(&self) -> Result<(), ConfigurationError> {
        self.save(&Self::get_default_configuration_file_path()?)
    }

    fn properties(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("api_domain", self.api_domain().unwrap_or_default()),
            ("auth_domain", self.auth_domain().unwrap_or_default()),
            ("org", self.org().unwrap_or_default()),
            ("env", self.env().unwrap_or_default()),
        ]
    }
}

impl Formattable for Configuration {
    fn format(&self, f: &OutputFormat) -> Result<String, FormattingError> {
        let table = self
            .properties()
            .into_iter()
            .fold(Table::new(&["PROPERTY", "VALUE"]), |table, (name, value)| {
                table.row([Cell::from(name), Cell::from(value)])
            });

        match f {
            OutputFormat::Json(options) => to_json(self, options),
            OutputFormat::Csv(options) => table.to_csv(options.with_headers),
            OutputFormat::Table(_) => Ok(table.render()),
        }
    }
}
