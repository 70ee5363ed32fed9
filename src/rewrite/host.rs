//! External host resolution.
//!
//! The external host is the authority the client used to reach the proxy.
//! It is taken verbatim from the inbound headers and never validated; a
//! `Host` carrying a full URL is echoed back as-is. Only run the proxy on
//! networks where clients are trusted to declare their own host.
//!
//! HTTP/2 clients and HTTP/1 absolute-form requests may carry the authority
//! in the request URI instead of a `Host` header; it is consulted after the
//! headers and before the configured fallback.

use std::fmt;

use axum::http::{header, HeaderMap, HeaderName, Uri};

/// `X-Forwarded-Host` header name.
pub static X_FORWARDED_HOST: HeaderName = HeaderName::from_static("x-forwarded-host");

/// A `host[:port]` string the client declared, treated as opaque.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExternalHost(String);

impl ExternalHost {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExternalHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolve the external host: `Host`, then `X-Forwarded-Host`, then the
/// request URI's authority, then `fallback`.
///
/// Empty values and values that are not visible ASCII count as absent.
/// When a header is repeated the last value wins.
pub fn resolve(headers: &HeaderMap, uri: &Uri, fallback: &ExternalHost) -> ExternalHost {
    last_non_empty(headers, &header::HOST)
        .or_else(|| last_non_empty(headers, &X_FORWARDED_HOST))
        .or_else(|| uri.authority().map(|authority| authority.as_str()))
        .map(ExternalHost::new)
        .unwrap_or_else(|| fallback.clone())
}

fn last_non_empty<'a>(headers: &'a HeaderMap, name: &HeaderName) -> Option<&'a str> {
    headers
        .get_all(name)
        .iter()
        .last()
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
}
