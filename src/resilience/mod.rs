//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Upstream attempt:
//!     → timeouts.rs (enforce the per-strategy deadline)
//!     → On failure: the relay engine moves to the next strategy
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - No retries of the same strategy and no backoff: fallback order is the only policy

pub mod timeouts;
