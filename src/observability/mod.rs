//! Logging and metrics.
//!
//! Handlers log through `tracing` and count through `metrics`; this module
//! only installs the subscriber and the optional Prometheus recorder.
//!
//! ```text
//! upload / echo / poster / http middleware
//!     → tracing events inside the per-request span (request_id)
//!     → metrics counters and the request latency histogram
//! ```
//!
//! Without `observability.metrics_enabled` no recorder is installed and every
//! `record_*` call is a no-op.

pub mod logging;
pub mod metrics;
