//! CORS relay library: fetch a target URL through a fixed fallback chain of
//! direct, proxy-pool and last-resort strategies.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod relay;
pub mod resilience;
pub mod routing;

pub use config::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use relay::Relay;
