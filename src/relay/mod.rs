//! Relay subsystem.
//!
//! # Data Flow
//! ```text
//! target URL
//!     → credentials.rs (inject server-held token, new URL)
//!     → routing (plan: Direct? → Pool[0..n] → LastResort)
//!     → engine.rs (timeout-wrapped attempt per strategy, first 2xx wins)
//!     → RelayedResponse | RelayError::AllStrategiesExhausted
//! ```

pub mod credentials;
pub mod engine;
pub mod pool;
pub mod types;

pub use engine::Relay;
pub use types::{AttemptError, RelayError, RelayResult, RelayedResponse};
