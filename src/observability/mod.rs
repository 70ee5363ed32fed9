//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (structured fields: path, external_host, tunnel_id)
//!     → tower_http spans per HTTP request
//!
//! Consumer:
//!     → logging.rs (fmt subscriber on stdout)
//! ```

pub mod logging;
