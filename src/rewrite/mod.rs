//! Interception hooks invoked by the proxy core.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → host.rs (remember the external host the client declared)
//!     → headers.rs (stamp spoofed Origin / Host / X-Forwarded-Host)
//!     → forwarded upstream
//!
//! Upstream response
//!     → policy.rs (/json/version? otherwise stream through)
//!     → [http::response buffers the body, bounded]
//!     → body.rs (swap spoofed host for external host in webSocketDebuggerUrl)
//!     → Send to client
//! ```
//!
//! # Design Decisions
//! - Every hook is a pure function of its inputs; nothing is shared across requests
//! - Rewriting never fails a request: bad input means passthrough

pub mod body;
pub mod headers;
pub mod host;
pub mod policy;

pub use body::{BodyRewriter, RewriteOutcome};
pub use headers::SpoofIdentity;
pub use host::ExternalHost;
pub use policy::{Interception, JSON_VERSION_PATH};
