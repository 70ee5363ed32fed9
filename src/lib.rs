//! Chrome DevTools Protocol reverse proxy library.
//!
//! Exposes a local CDP endpoint on an external host. Outbound requests are
//! stamped with an identity the CDP target trusts, and `/json/version` is
//! rewritten so its `webSocketDebuggerUrl` points back at the proxy.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod rewrite;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
