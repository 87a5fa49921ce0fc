//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Sink send:
//!     → timeouts.rs (optional per-sink deadline)
//!     → on expiry: Sink::reset, local warning
//! ```
//!
//! # Design Decisions
//! - Remote delivery is best effort: no retries, no buffering
//! - A failing sink never affects the other sinks of the same call

pub mod timeouts;
