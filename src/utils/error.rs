use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Invalid quote request: {message}")]
    InvalidRequest { message: String },

    #[error("Shipping provider unreachable: {0}")]
    ProviderUnreachable(#[from] reqwest::Error),

    #[error("Shipping provider rejected the request (status {status}): {body}")]
    ProviderRejected { status: u16, body: String },

    #[error("Malformed shipping provider response: {0}")]
    ProviderResponseMalformed(#[from] serde_json::Error),

    #[error("Quote request canceled before the provider answered")]
    Canceled,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl RelayError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Errors caused by the caller's input rather than by the relay or the provider.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidRequest { .. })
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::InvalidRequest { message } => message.clone(),
            Self::ProviderUnreachable(_) | Self::ProviderRejected { .. } => {
                "The shipping provider could not be reached".to_string()
            }
            Self::ProviderResponseMalformed(_) => {
                "The shipping provider answered with an unreadable response".to_string()
            }
            Self::Canceled => "The quote request was canceled".to_string(),
            Self::IoError(e) => format!("Could not read configuration: {}", e),
            Self::ConfigError { message } => format!("Configuration problem: {}", message),
            Self::MissingConfigError { field } => {
                format!("Configuration field '{}' is required", field)
            }
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration field '{}' is invalid: {}", field, reason)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::InvalidRequest { .. } => "Send an 8-digit destination postal code (CEP)",
            Self::ProviderUnreachable(_) | Self::Canceled => {
                "Check network access to the provider base URL and try again"
            }
            Self::ProviderRejected { .. } => {
                "Check that the access token is valid and has the shipping-calculate scope"
            }
            Self::ProviderResponseMalformed(_) => {
                "Check that the base URL points at the provider API (e.g. .../api/v2)"
            }
            Self::IoError(_) => "Make sure the config file exists and is readable",
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => {
                "Fix the configuration file or the MELHOR_ENVIO_* / SHIPQUOTE_* environment variables"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_invalid_request_is_client_error() {
        assert!(RelayError::invalid_request("bad cep").is_client_error());
        assert!(!RelayError::Canceled.is_client_error());
        assert!(!RelayError::ProviderRejected {
            status: 401,
            body: "Unauthenticated.".to_string()
        }
        .is_client_error());
    }

    #[test]
    fn test_config_error_message_names_field() {
        let err = RelayError::MissingConfigError {
            field: "provider.access_token".to_string(),
        };
        assert!(err.user_friendly_message().contains("provider.access_token"));
        assert!(!err.is_client_error());
    }
}
