//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (bind, accept via axum::serve)
//!     → Hand off to HTTP layer
//!
//! WebSocket upgrade accepted
//!     → connection.rs (tunnel id, live tunnel count)
//!     → bytes copied both ways until either side closes
//! ```

pub mod connection;
pub mod listener;
