//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Target URL (credential already injected)
//!     → matcher.rs (evaluate direct rules)
//!     → router.rs (build the ordered strategy plan)
//!     → Return: [Direct?, Pool[0..n], LastResort]
//!
//! Rule Compilation (at startup):
//!     DirectRule[] + proxy_pool[]
//!     → Compile matchers
//!     → Freeze as immutable Router
//! ```
//!
//! # Design Decisions
//! - Rules compiled at startup, immutable at runtime
//! - No regex in hot path (substring and host comparisons only)
//! - Deterministic: same target always yields the same plan

pub mod matcher;
pub mod router;

pub use router::{Router, Strategy};
