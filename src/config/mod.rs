#[cfg(feature = "cli")]
pub mod cli;

use crate::utils::error::{RelayError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::net::SocketAddr;
use std::path::Path;

pub const DEFAULT_BASE_URL: &str = "https://melhorenvio.com.br/api/v2";
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
pub const DEFAULT_ORIGIN_POSTAL_CODE: &str = "56318620";
pub const DEFAULT_PLATFORM: &str = "ChatBolt E-commerce";
pub const DEFAULT_PRODUCT_NAME: &str = "Produto Checkout";
pub const DEFAULT_INSURANCE_VALUE: f64 = 100.00;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub provider: ProviderConfig,
    #[serde(default)]
    pub shipment: ShipmentSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            allowed_origins: default_allowed_origins(),
        }
    }
}

/// Melhor Envio credentials and endpoint.
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub access_token: String,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

/// Fixed values every provider payload is built with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentSettings {
    #[serde(default = "default_origin_postal_code")]
    pub origin_postal_code: String,
    #[serde(default = "default_platform")]
    pub platform: String,
    #[serde(default = "default_product_name")]
    pub product_name: String,
    #[serde(default = "default_insurance_value")]
    pub insurance_value: f64,
}

impl Default for ShipmentSettings {
    fn default() -> Self {
        Self {
            origin_postal_code: default_origin_postal_code(),
            platform: default_platform(),
            product_name: default_product_name(),
            insurance_value: default_insurance_value(),
        }
    }
}

fn default_bind_address() -> String {
    DEFAULT_BIND_ADDRESS.to_string()
}

fn default_allowed_origins() -> Vec<String> {
    vec!["http://localhost:3000".to_string()]
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_origin_postal_code() -> String {
    DEFAULT_ORIGIN_POSTAL_CODE.to_string()
}

fn default_platform() -> String {
    DEFAULT_PLATFORM.to_string()
}

fn default_product_name() -> String {
    DEFAULT_PRODUCT_NAME.to_string()
}

fn default_insurance_value() -> f64 {
    DEFAULT_INSURANCE_VALUE
}

impl RelayConfig {
    /// Loads the configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(RelayError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parses a TOML document after `${VAR}` substitution.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| RelayError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unset variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| RelayError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Builds the configuration from `MELHOR_ENVIO_*` / `SHIPQUOTE_*` variables only.
    pub fn from_env() -> Result<Self> {
        let required = |name: &str| {
            env::var(name).map_err(|_| RelayError::MissingConfigError {
                field: name.to_string(),
            })
        };

        let defaults = ShipmentSettings::default();

        Ok(Self {
            server: ServerConfig {
                bind_address: env::var("SHIPQUOTE_BIND_ADDRESS")
                    .unwrap_or_else(|_| default_bind_address()),
                allowed_origins: env::var("SHIPQUOTE_ALLOWED_ORIGINS")
                    .map(|v| {
                        v.split(',')
                            .map(str::trim)
                            .filter(|s| !s.is_empty())
                            .map(str::to_string)
                            .collect()
                    })
                    .unwrap_or_else(|_| default_allowed_origins()),
            },
            provider: ProviderConfig {
                client_id: required("MELHOR_ENVIO_CLIENT_ID")?,
                client_secret: required("MELHOR_ENVIO_CLIENT_SECRET")?,
                base_url: env::var("MELHOR_ENVIO_BASE_URL").unwrap_or_else(|_| default_base_url()),
                access_token: required("MELHOR_ENVIO_TOKEN")?,
            },
            shipment: ShipmentSettings {
                origin_postal_code: env::var("SHIPQUOTE_ORIGIN_POSTAL_CODE")
                    .unwrap_or(defaults.origin_postal_code),
                platform: env::var("SHIPQUOTE_PLATFORM").unwrap_or(defaults.platform),
                ..defaults
            },
        })
    }

    pub fn bind_address(&self) -> Result<SocketAddr> {
        validation::validate_socket_address("server.bind_address", &self.server.bind_address)
    }

    /// Checks every field the server needs before it binds.
    pub fn validate_config(&self) -> Result<()> {
        self.bind_address()?;

        for origin in &self.server.allowed_origins {
            validation::validate_origin("server.allowed_origins", origin)?;
        }

        validation::validate_url("provider.base_url", &self.provider.base_url)?;
        validation::validate_secret("provider.client_id", &self.provider.client_id)?;
        validation::validate_secret("provider.client_secret", &self.provider.client_secret)?;
        validation::validate_secret("provider.access_token", &self.provider.access_token)?;

        self.shipment.validate()
    }
}

impl Validate for RelayConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

impl Validate for ShipmentSettings {
    fn validate(&self) -> Result<()> {
        validation::validate_postal_code("shipment.origin_postal_code", &self.origin_postal_code)?;
        validation::validate_non_empty_string("shipment.platform", &self.platform)?;
        validation::validate_non_empty_string("shipment.product_name", &self.product_name)?;
        validation::validate_positive_amount("shipment.insurance_value", self.insurance_value)
    }
}
