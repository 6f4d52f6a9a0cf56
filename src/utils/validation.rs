use crate::utils::error::{RelayError, Result};
use std::net::SocketAddr;
use url::Url;

/// Length of a Brazilian postal code (CEP) once separators are removed.
pub const POSTAL_CODE_LEN: usize = 8;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(RelayError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(RelayError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(RelayError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

/// A browser `Origin` value: scheme, host and optional port, nothing else.
pub fn validate_origin(field_name: &str, origin: &str) -> Result<()> {
    validate_url(field_name, origin)?;

    let url = Url::parse(origin).map_err(|e| RelayError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: origin.to_string(),
        reason: format!("Invalid URL format: {}", e),
    })?;

    let serialized = url.origin().ascii_serialization();
    if serialized != origin {
        return Err(RelayError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: origin.to_string(),
            reason: format!(
                "Origin must not carry a path, query or trailing slash (expected '{}')",
                serialized
            ),
        });
    }

    Ok(())
}

/// Secrets are never echoed back in the error value.
pub fn validate_secret(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(RelayError::MissingConfigError {
            field: field_name.to_string(),
        });
    }

    if value.starts_with("${") && value.ends_with('}') {
        return Err(RelayError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Environment variable placeholder was not substituted".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(RelayError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_postal_code(field_name: &str, value: &str) -> Result<()> {
    if value.len() != POSTAL_CODE_LEN || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(RelayError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Postal code must be exactly {} digits", POSTAL_CODE_LEN),
        });
    }
    Ok(())
}

pub fn validate_socket_address(field_name: &str, value: &str) -> Result<SocketAddr> {
    value
        .parse::<SocketAddr>()
        .map_err(|e| RelayError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Invalid socket address: {}", e),
        })
}

pub fn validate_positive_amount(field_name: &str, value: f64) -> Result<()> {
    if !(value > 0.0) || !value.is_finite() {
        return Err(RelayError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value must be a positive, finite amount".to_string(),
        });
    }
    Ok(())
}
