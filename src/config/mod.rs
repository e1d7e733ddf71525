//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML), optional
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → each section handed to its handler's constructor
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::AppConfig;
pub use schema::CollisionPolicy;
pub use schema::EchoConfig;
pub use schema::ListenerConfig;
pub use schema::ObservabilityConfig;
pub use schema::PosterConfig;
pub use schema::UploadConfig;
pub use validation::{validate_config, ValidationError};
