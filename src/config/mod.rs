//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML) or built-in defaults
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RelayConfig (validated, immutable)
//!     → shared via Arc with the relay engine
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the proxy pool never changes at runtime
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    CacheConfig, CredentialRule, CredentialSource, DirectRule, ListenerConfig, MatchKind,
    ObservabilityConfig, RelayConfig, StrategyConfig, TimeoutConfig,
};
