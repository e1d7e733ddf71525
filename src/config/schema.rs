//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the handlers.
//! All types derive Serde traits for deserialization from config files.
//! Defaults reproduce the fixed constants the handlers were first written with,
//! so an empty file (or no file at all) yields a working setup.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upload handler settings.
    pub upload: UploadConfig,

    /// Echo/diagnostics handler settings.
    pub echo: EchoConfig,

    /// Outbound form poster settings.
    pub poster: PosterConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request size limits.
    pub security: SecurityConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// What to do when the destination name already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Replace the existing file (last write wins).
    #[default]
    Overwrite,
    /// Store under the first free `stem-N.ext`.
    Suffix,
}

/// Upload handler configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Route serving the upload form.
    pub route: String,

    /// Name of the multipart file field.
    pub field_name: String,

    /// Destination directory, created on demand.
    pub directory: PathBuf,

    /// Staging directory for in-flight uploads (system temp dir when unset).
    pub temp_dir: Option<PathBuf>,

    /// Permitted extensions, lower-case, without the dot.
    pub allowed_extensions: Vec<String>,

    /// Maximum size of a single uploaded file in bytes.
    pub max_file_size: u64,

    /// Behavior when the sanitized name is already taken.
    pub on_conflict: CollisionPolicy,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            route: "/post_file".to_string(),
            field_name: "upload".to_string(),
            directory: PathBuf::from("uploads"),
            temp_dir: None,
            allowed_extensions: vec!["jpg".to_string(), "png".to_string(), "gif".to_string()],
            max_file_size: 2 * 1024 * 1024, // 2MB
            on_conflict: CollisionPolicy::Overwrite,
        }
    }
}

/// Echo handler configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EchoConfig {
    /// Route of the echo page. Anything below it is reported as path info.
    pub route: String,

    /// Reported document root.
    pub document_root: PathBuf,
}

impl Default for EchoConfig {
    fn default() -> Self {
        Self {
            route: "/submit".to_string(),
            document_root: PathBuf::from("."),
        }
    }
}

/// Form poster configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PosterConfig {
    /// Route that triggers the outbound POST.
    pub route: String,

    /// Destination URL.
    pub endpoint: String,

    /// Fields sent when the route is hit.
    pub fields: BTreeMap<String, String>,

    /// Whole-request timeout for the outbound call. Transport default when unset.
    pub timeout_secs: Option<u64>,
}

impl Default for PosterConfig {
    fn default() -> Self {
        let mut fields = BTreeMap::new();
        fields.insert("name1".to_string(), "value 1".to_string());
        fields.insert("name2".to_string(), "value 2".to_string());

        Self {
            route: "/post_direct".to_string(),
            endpoint: "http://127.0.0.1:8080/submit".to_string(),
            fields,
            timeout_secs: None,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Request size limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum request body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 8 * 1024 * 1024, // 8MB
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format ("pretty" or "json").
    pub log_format: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
