//! Form handlers: file upload, request echo and outbound form posting,
//! served from one axum application.

pub mod config;
pub mod echo;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod poster;
pub mod upload;

pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
