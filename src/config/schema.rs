//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Relay strategies: proxy pool, direct rules, credentials.
    pub relay: StrategyConfig,

    /// Cache directives attached to relayed responses.
    pub cache: CacheConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration for the inbound request and each upstream attempt.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Hard ceiling for one inbound request, in seconds.
    pub request_secs: u64,

    /// Direct fetch of a whitelisted target, in milliseconds.
    pub direct_ms: u64,

    /// Each proxy pool attempt, in milliseconds.
    pub pool_ms: u64,

    /// Final bare fetch, in milliseconds.
    pub last_resort_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 90,
            direct_ms: 8_000,
            pool_ms: 10_000,
            last_resort_ms: 5_000,
        }
    }
}

/// How a direct rule is compared against the target URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Raw substring anywhere in the URL.
    Contains,
    /// Parsed host equals the pattern or is a subdomain of it.
    Host,
    /// Parsed host ends with the pattern.
    HostSuffix,
}

/// A rule that lets a target skip straight to a direct fetch.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DirectRule {
    pub kind: MatchKind,
    pub pattern: String,
}

impl DirectRule {
    pub fn new(kind: MatchKind, pattern: impl Into<String>) -> Self {
        Self {
            kind,
            pattern: pattern.into(),
        }
    }
}

/// Where a credential value comes from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialSource {
    /// Read from this environment variable on every request.
    Env(String),
    /// Fixed value from the config file.
    Static(String),
}

/// Injects an access token into requests for a finance-data API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CredentialRule {
    /// Host (or parent domain) the rule applies to.
    pub host: String,

    /// Query parameter that carries the token.
    pub query_param: String,

    pub source: CredentialSource,
}

/// Relay strategy configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StrategyConfig {
    /// Ordered CORS-proxy templates tried after the direct fetch.
    pub proxy_pool: Vec<String>,

    /// Targets matching any of these are fetched directly first.
    pub direct_rules: Vec<DirectRule>,

    /// Credentials injected before any fetch.
    pub credentials: Vec<CredentialRule>,

    /// Largest upstream body the relay will buffer.
    pub max_body_bytes: usize,

    /// Honor HTTP(S)_PROXY from the environment for outbound requests.
    pub use_system_proxy: bool,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            proxy_pool: vec![
                "https://api.allorigins.win/raw?url=".to_string(),
                "https://corsproxy.io/?url=".to_string(),
                "https://proxy.cors.sh/".to_string(),
                "https://thingproxy.freeboard.io/fetch/".to_string(),
                "https://cors-anywhere.herokuapp.com/".to_string(),
            ],
            direct_rules: vec![
                DirectRule::new(MatchKind::Contains, "gdelt"),
                DirectRule::new(MatchKind::Contains, "sourcelang:chinese"),
                DirectRule::new(MatchKind::HostSuffix, ".cn"),
                DirectRule::new(MatchKind::Host, "finnhub.io"),
                DirectRule::new(MatchKind::Host, "api.coingecko.com"),
                DirectRule::new(MatchKind::Host, "query1.finance.yahoo.com"),
                DirectRule::new(MatchKind::Host, "cdn.jsdelivr.net"),
                DirectRule::new(MatchKind::Host, "api.open-meteo.com"),
            ],
            credentials: vec![
                CredentialRule {
                    host: "finnhub.io".to_string(),
                    query_param: "token".to_string(),
                    source: CredentialSource::Env("VITE_FINNHUB_API_KEY".to_string()),
                },
                CredentialRule {
                    host: "api.stlouisfed.org".to_string(),
                    query_param: "api_key".to_string(),
                    source: CredentialSource::Env("VITE_FRED_API_KEY".to_string()),
                },
            ],
            max_body_bytes: 10 * 1024 * 1024, // 10MB
            use_system_proxy: true,
        }
    }
}

/// `Cache-Control` directives for relayed responses.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// max-age for responses served through the proxy pool.
    pub pool_max_age_secs: Option<u64>,

    /// max-age for responses served by a direct fetch.
    pub direct_max_age_secs: Option<u64>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            pool_max_age_secs: Some(300),
            direct_max_age_secs: None,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
