//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, catch-all handler)
//!     → websocket.rs (upgrade? tunnel it, no interception)
//!     → request.rs (re-target at upstream, spoof identity)
//!     → [hyper client forwards to the CDP target]
//!     → response.rs (stream through, or buffer and rewrite /json/version)
//!     → Send to client
//! ```

pub mod context;
pub mod error;
pub mod request;
pub mod response;
pub mod server;
pub mod websocket;

pub use context::ProxyContext;
pub use error::ProxyError;
pub use server::HttpServer;
