//! Process lifecycle: signal handling and graceful shutdown.
//!
//! ```text
//! SIGINT / SIGTERM
//!     → signals.rs shutdown_signal() resolves
//!     → Shutdown::trigger() broadcasts
//!     → HttpServer::run stops accepting and drains in-flight requests
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::{wait_for, Shutdown};
pub use signals::shutdown_signal;
