//! Outbound request preparation.
//!
//! # Responsibilities
//! - Re-target the request at the upstream (scheme + authority, same path and query)
//! - Keep method, headers and body as received
//! - Optionally record client information in `X-Forwarded-*`
//! - Stamp the spoofed identity last, so it always wins
//!
//! # Design Decisions
//! - Upstream requests are always HTTP/1.1, the only version the CDP target speaks
//! - The header map is moved, not copied entry by entry, so repeated headers survive

use std::net::SocketAddr;

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Request, Version};

use crate::http::context::ProxyContext;
use crate::http::error::ProxyError;

pub static X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");
pub static X_FORWARDED_PROTO: HeaderName = HeaderName::from_static("x-forwarded-proto");
pub static X_FORWARDED_PORT: HeaderName = HeaderName::from_static("x-forwarded-port");

/// Build the request sent to the CDP target.
pub fn prepare(
    request: Request<Body>,
    context: &ProxyContext,
    peer: SocketAddr,
    is_upgrade: bool,
) -> Result<Request<Body>, ProxyError> {
    let (parts, body) = request.into_parts();

    let mut outbound = Request::builder()
        .method(parts.method)
        .version(Version::HTTP_11)
        .uri(context.upstream.uri_for(&parts.uri)?)
        .body(body)?;
    *outbound.headers_mut() = parts.headers;

    if context.xfwd {
        append_forwarded(outbound.headers_mut(), peer, is_upgrade);
    }
    context.spoof.apply(outbound.headers_mut());

    Ok(outbound)
}

/// Add `X-Forwarded-For`, `X-Forwarded-Proto` and `X-Forwarded-Port`
/// describing the client connection.
fn append_forwarded(headers: &mut HeaderMap, peer: SocketAddr, is_upgrade: bool) {
    let client_ip = peer.ip().to_string();
    let forwarded_for = match headers.get(&X_FORWARDED_FOR).and_then(|v| v.to_str().ok()) {
        Some(existing) if !existing.is_empty() => format!("{}, {}", existing, client_ip),
        _ => client_ip,
    };
    if let Ok(value) = HeaderValue::from_str(&forwarded_for) {
        headers.insert(&X_FORWARDED_FOR, value);
    }

    let proto = if is_upgrade { "ws" } else { "http" };
    headers.insert(&X_FORWARDED_PROTO, HeaderValue::from_static(proto));

    let port = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .and_then(|host| host.rsplit_once(':'))
        .map(|(_, port)| port)
        .filter(|port| !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()))
        .unwrap_or("80")
        .to_string();
    if let Ok(value) = HeaderValue::from_str(&port) {
        headers.insert(&X_FORWARDED_PORT, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProxyConfig;
    use crate::rewrite::host::X_FORWARDED_HOST;
    use axum::http::Method;

    fn context(xfwd: bool) -> ProxyContext {
        let mut config = ProxyConfig::default();
        config.upstream.target = "http://127.0.0.1:9222".into();
        config.forwarding.xfwd = xfwd;
        ProxyContext::from_config(&config).unwrap()
    }

    fn peer() -> SocketAddr {
        "203.0.113.7:51234".parse().unwrap()
    }

    fn inbound() -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/json/new?about:blank")
            .header(header::HOST, "example.com:30001")
            .header(header::ORIGIN, "https://example.com")
            .header("x-custom", "one")
            .header("x-custom", "two")
            .body(Body::from("payload"))
            .unwrap()
    }

    #[tokio::test]
    async fn spoofs_identity_and_keeps_the_rest() {
        let outbound = prepare(inbound(), &context(false), peer(), false).unwrap();

        assert_eq!(outbound.method(), Method::POST);
        assert_eq!(outbound.version(), Version::HTTP_11);
        assert_eq!(outbound.uri().to_string(), "http://127.0.0.1:9222/json/new?about:blank");
        assert_eq!(outbound.headers()[header::HOST], "localhost:30001");
        assert_eq!(outbound.headers()[header::ORIGIN], "http://localhost:30001");
        assert_eq!(outbound.headers()[&X_FORWARDED_HOST], "localhost:30001");

        let custom: Vec<_> = outbound.headers().get_all("x-custom").iter().collect();
        assert_eq!(custom, vec!["one", "two"]);
        assert!(outbound.headers().get(&X_FORWARDED_FOR).is_none());

        let body = axum::body::to_bytes(outbound.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"payload");
    }

    #[test]
    fn xfwd_records_client_before_spoofing() {
        let mut request = inbound();
        request
            .headers_mut()
            .insert(&X_FORWARDED_FOR, HeaderValue::from_static("10.0.0.1"));

        let outbound = prepare(request, &context(true), peer(), true).unwrap();

        assert_eq!(outbound.headers()[&X_FORWARDED_FOR], "10.0.0.1, 203.0.113.7");
        assert_eq!(outbound.headers()[&X_FORWARDED_PROTO], "ws");
        assert_eq!(outbound.headers()[&X_FORWARDED_PORT], "30001");
        assert_eq!(outbound.headers()[&X_FORWARDED_HOST], "localhost:30001");
    }

    #[test]
    fn xfwd_port_defaults_to_80() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("example.com"));

        append_forwarded(&mut headers, peer(), false);

        assert_eq!(headers[&X_FORWARDED_PORT], "80");
        assert_eq!(headers[&X_FORWARDED_PROTO], "http");
        assert_eq!(headers[&X_FORWARDED_FOR], "203.0.113.7");
    }
}
