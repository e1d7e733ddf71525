//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, routes and the poster endpoint
//! - Validate value ranges (timeouts > 0, sizes consistent)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::AppConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: [&str; 2] = ["pretty", "json"];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field}: route '{value}' must start with '/' and contain no '{{' or '}}'")]
    InvalidRoute { field: &'static str, value: String },

    #[error("route '{0}' is used by more than one handler")]
    DuplicateRoute(String),

    #[error("poster.endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("upload.allowed_extensions must not be empty")]
    EmptyAllowList,

    #[error("upload.allowed_extensions: '{0}' must be lower-case alphanumeric without a dot")]
    InvalidExtension(String),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("security.max_body_size ({body}) is smaller than upload.max_file_size ({file})")]
    BodyLimitTooSmall { body: usize, file: u64 },

    #[error("upload.field_name must not be empty")]
    EmptyFieldName,

    #[error("observability.{field}: unsupported value '{value}'")]
    Unsupported { field: &'static str, value: String },
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    let routes = [
        ("upload.route", &config.upload.route),
        ("echo.route", &config.echo.route),
        ("poster.route", &config.poster.route),
    ];
    for (i, &(field, route)) in routes.iter().enumerate() {
        if !is_valid_route(route) {
            errors.push(ValidationError::InvalidRoute {
                field,
                value: route.to_string(),
            });
        }
        if routes[..i].iter().any(|(_, other)| *other == route) {
            errors.push(ValidationError::DuplicateRoute(route.to_string()));
        }
    }

    match Url::parse(&config.poster.endpoint) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError::InvalidEndpoint(format!(
            "unsupported scheme '{}'",
            url.scheme()
        ))),
        Err(e) => errors.push(ValidationError::InvalidEndpoint(e.to_string())),
    }

    if config.upload.allowed_extensions.is_empty() {
        errors.push(ValidationError::EmptyAllowList);
    }
    for ext in &config.upload.allowed_extensions {
        let valid = !ext.is_empty()
            && ext
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit());
        if !valid {
            errors.push(ValidationError::InvalidExtension(ext.clone()));
        }
    }

    if config.upload.field_name.is_empty() {
        errors.push(ValidationError::EmptyFieldName);
    }
    if config.upload.max_file_size == 0 {
        errors.push(ValidationError::Zero("upload.max_file_size"));
    }
    if (config.security.max_body_size as u64) < config.upload.max_file_size {
        errors.push(ValidationError::BodyLimitTooSmall {
            body: config.security.max_body_size,
            file: config.upload.max_file_size,
        });
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.request_secs"));
    }
    if config.poster.timeout_secs == Some(0) {
        errors.push(ValidationError::Zero("poster.timeout_secs"));
    }

    let obs = &config.observability;
    if !LOG_LEVELS.contains(&obs.log_level.as_str()) {
        errors.push(ValidationError::Unsupported {
            field: "log_level",
            value: obs.log_level.clone(),
        });
    }
    if !LOG_FORMATS.contains(&obs.log_format.as_str()) {
        errors.push(ValidationError::Unsupported {
            field: "log_format",
            value: obs.log_format.clone(),
        });
    }
    if obs.metrics_enabled && obs.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: obs.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_valid_route(route: &str) -> bool {
    route.starts_with('/') && !route.contains('{') && !route.contains('}')
}
