//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Relay engine and HTTP handlers produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every log line of a request via the trace span
//! - Metrics are cheap (atomic increments) and disabled by default

pub mod logging;
pub mod metrics;
