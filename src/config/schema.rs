//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Default address the proxy listens on, and the authority the upstream trusts.
pub const DEFAULT_LISTEN_AUTHORITY: &str = "localhost:30001";

/// Root configuration for the CDP proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// The single CDP endpoint being proxied.
    pub upstream: UpstreamConfig,

    /// Identity presented to the upstream.
    pub spoof: SpoofConfig,

    /// `/json/version` rewriting settings.
    pub rewrite: RewriteConfig,

    /// Client information forwarding.
    pub forwarding: ForwardingConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:30001").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:30001".to_string(),
        }
    }
}

/// Upstream CDP target.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the CDP endpoint (e.g., "http://localhost:9222").
    pub target: String,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            target: "http://localhost:9222".to_string(),
            connect_timeout_secs: 5,
        }
    }
}

/// Spoofed identity written into every outbound request.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SpoofConfig {
    /// Authority sent as `Host` and `X-Forwarded-Host`.
    /// Also the substring replaced inside `webSocketDebuggerUrl`.
    pub host: String,

    /// `Origin` value. Defaults to `http://{host}` when unset.
    pub origin: Option<String>,
}

impl SpoofConfig {
    /// The `Origin` header value to send upstream.
    pub fn effective_origin(&self) -> String {
        match &self.origin {
            Some(origin) => origin.clone(),
            None => format!("http://{}", self.host),
        }
    }
}

impl Default for SpoofConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_LISTEN_AUTHORITY.to_string(),
            origin: None,
        }
    }
}

/// Response rewriting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RewriteConfig {
    /// External host used when a request carries neither `Host` nor `X-Forwarded-Host`.
    pub fallback_host: String,

    /// Largest `/json/version` body buffered for rewriting, in bytes.
    pub max_body_bytes: usize,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            fallback_host: DEFAULT_LISTEN_AUTHORITY.to_string(),
            max_body_bytes: 64 * 1024,
        }
    }
}

/// Client information forwarding.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ForwardingConfig {
    /// Add `X-Forwarded-For`, `X-Forwarded-Proto` and `X-Forwarded-Port`.
    pub xfwd: bool,
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Time allowed until response headers are ready, in seconds.
    /// Upgraded tunnels and streamed bodies are not bounded by it.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines instead of the human-readable format.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}
