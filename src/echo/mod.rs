//! Echo/diagnostics subsystem.
//!
//! # Data Flow
//! ```text
//! any request to the echo route (or below it)
//!     → request.rs (method, protocol, paths, query/body parameters)
//!     → handler.rs (labelled lines, HTML-escaped)
//! ```
//!
//! # Design Decisions
//! - Read-only: no side effects, no method restrictions
//! - Every value is escaped, including server-side paths

pub mod handler;
pub mod params;
pub mod request;

pub use handler::EchoHandler;
pub use params::Params;
pub use request::EchoRequest;
