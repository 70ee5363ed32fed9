//! Response interception policy.
//!
//! Exactly one CDP endpoint, `/json/version`, advertises a WebSocket URL that
//! must point back at the proxy. Every other response streams straight
//! through; buffering a debugger socket would break the session.

/// The only path whose response body is rewritten.
pub const JSON_VERSION_PATH: &str = "/json/version";

/// What the proxy does with an upstream response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interception {
    /// Relay status, headers and body untouched, without buffering.
    Passthrough,
    /// Buffer the body and hand it to the body rewriter.
    Rewrite,
}

/// `true` iff `path` is exactly the rewrite target. Query strings are not
/// part of `path`; trailing slashes and case variants do not match.
pub fn should_intercept(path: &str) -> bool {
    path == JSON_VERSION_PATH
}

/// Decide for a request. Upgrades are always passed through, whatever the path.
pub fn decide(path: &str, is_upgrade: bool) -> Interception {
    if !is_upgrade && should_intercept(path) {
        Interception::Rewrite
    } else {
        Interception::Passthrough
    }
}
