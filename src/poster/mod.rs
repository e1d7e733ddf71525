//! Outbound form posting.
//!
//! # Data Flow
//! ```text
//! fields (key/value pairs)
//!     → client.rs encode_form (url-encoded body)
//!     → one HTTP POST to the configured endpoint
//!     → response body returned verbatim, or NetworkError
//! ```

pub mod client;
pub mod error;

pub use client::{encode_form, FormPoster, FORM_CONTENT_TYPE};
pub use error::{NetworkError, NetworkResult};
