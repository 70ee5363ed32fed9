//! Upgraded tunnel tracking.
//!
//! # Responsibilities
//! - Generate unique tunnel IDs for tracing (`ws-N`)
//! - Count live WebSocket tunnels
//! - Release the slot automatically when a tunnel task ends

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Global atomic counter for tunnel IDs.
/// Relaxed ordering is enough; only uniqueness matters.
static TUNNEL_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for an upgraded connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TunnelId(u64);

impl TunnelId {
    /// Generate a new unique tunnel ID.
    pub fn new() -> Self {
        Self(TUNNEL_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for TunnelId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TunnelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ws-{}", self.0)
    }
}

/// Counts live tunnels. Cloning shares the count.
#[derive(Debug, Clone, Default)]
pub struct TunnelTracker {
    active_count: Arc<AtomicU64>,
}

impl TunnelTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new tunnel. Returns a guard that decrements on drop.
    pub fn track(&self) -> TunnelGuard {
        let active = self.active_count.fetch_add(1, Ordering::SeqCst) + 1;
        let id = TunnelId::new();
        tracing::debug!(tunnel_id = %id, active, "Tunnel opened");
        TunnelGuard {
            active_count: Arc::clone(&self.active_count),
            id,
        }
    }

    /// Current live tunnel count.
    pub fn active_count(&self) -> u64 {
        self.active_count.load(Ordering::SeqCst)
    }
}

/// Guard that tracks a tunnel's lifetime.
#[derive(Debug)]
pub struct TunnelGuard {
    active_count: Arc<AtomicU64>,
    id: TunnelId,
}

impl TunnelGuard {
    pub fn id(&self) -> TunnelId {
        self.id
    }
}

impl Drop for TunnelGuard {
    fn drop(&mut self) {
        let active = self.active_count.fetch_sub(1, Ordering::SeqCst) - 1;
        tracing::debug!(tunnel_id = %self.id, active, "Tunnel closed");
    }
}
