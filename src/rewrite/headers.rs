//! Outbound header spoofing.
//!
//! The CDP target only accepts requests whose `Host` and `Origin` look like
//! localhost. Every forwarded request, upgrades included, is stamped with the
//! identity configured at startup. Nothing else in the request changes.

use axum::http::{header, HeaderMap, HeaderValue};

use crate::config::SpoofConfig;
use crate::rewrite::host::X_FORWARDED_HOST;

/// Error building a [`SpoofIdentity`] from configuration.
#[derive(Debug, thiserror::Error)]
#[error("spoofed value `{value}` is not a valid header value")]
pub struct InvalidSpoofValue {
    value: String,
}

/// The identity the upstream trusts, as ready-to-send header values.
#[derive(Debug, Clone)]
pub struct SpoofIdentity {
    host: HeaderValue,
    origin: HeaderValue,
}

impl SpoofIdentity {
    pub fn from_config(config: &SpoofConfig) -> Result<Self, InvalidSpoofValue> {
        Ok(Self {
            host: header_value(&config.host)?,
            origin: header_value(&config.effective_origin())?,
        })
    }

    /// Value sent as `Host` and `X-Forwarded-Host`.
    pub fn host(&self) -> &str {
        self.host.to_str().unwrap_or_default()
    }

    /// Value sent as `Origin`.
    pub fn origin(&self) -> &str {
        self.origin.to_str().unwrap_or_default()
    }

    /// Overwrite `Origin`, `X-Forwarded-Host` and `Host`.
    pub fn apply(&self, headers: &mut HeaderMap) {
        headers.insert(header::ORIGIN, self.origin.clone());
        headers.insert(&X_FORWARDED_HOST, self.host.clone());
        headers.insert(header::HOST, self.host.clone());
    }
}

fn header_value(value: &str) -> Result<HeaderValue, InvalidSpoofValue> {
    HeaderValue::from_str(value).map_err(|_| InvalidSpoofValue {
        value: value.to_string(),
    })
}
