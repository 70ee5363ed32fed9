//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the upstream target is a plain `http` base URL
//! - Check spoofed values can be sent as header values
//! - Validate value ranges (timeouts > 0, buffer cap > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::HeaderValue;
use url::Url;

use crate::config::schema::ProxyConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a socket address")]
    BindAddress(String),

    #[error("upstream.target `{target}` is invalid: {reason}")]
    UpstreamTarget { target: String, reason: String },

    #[error("{field} `{value}` is not a valid header value")]
    HeaderValue { field: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// Validate a merged configuration.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if let Err(reason) = check_target(&config.upstream.target) {
        errors.push(ValidationError::UpstreamTarget {
            target: config.upstream.target.clone(),
            reason,
        });
    }

    check_header(&mut errors, "spoof.host", &config.spoof.host);
    check_header(&mut errors, "spoof.origin", &config.spoof.effective_origin());
    check_header(&mut errors, "rewrite.fallback_host", &config.rewrite.fallback_host);

    if config.rewrite.max_body_bytes == 0 {
        errors.push(ValidationError::Zero("rewrite.max_body_bytes"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.request_secs"));
    }
    if config.upstream.connect_timeout_secs == 0 {
        errors.push(ValidationError::Zero("upstream.connect_timeout_secs"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_target(target: &str) -> Result<(), String> {
    let url = Url::parse(target).map_err(|e| e.to_string())?;
    if url.scheme() != "http" {
        return Err(format!("scheme `{}` is not supported, use http", url.scheme()));
    }
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    if url.path() != "/" || url.query().is_some() {
        return Err("must not carry a path or query".to_string());
    }
    Ok(())
}

fn check_header(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.is_empty() || HeaderValue::from_str(value).is_err() {
        errors.push(ValidationError::HeaderValue {
            field,
            value: value.to_string(),
        });
    }
}
