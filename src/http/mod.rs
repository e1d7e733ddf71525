//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID stamped and propagated)
//!     → handlers.rs (route → upload / echo / poster)
//!     → html.rs (escaping, page skeleton)
//!     → Send to client
//! ```

pub mod handlers;
pub mod html;
pub mod request;
pub mod server;

pub use request::{RequestIdExt, X_REQUEST_ID};
pub use server::{AppState, HttpServer, ServerError};
