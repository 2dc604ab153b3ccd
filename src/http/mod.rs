//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, query parameters)
//!     → relay engine (strategies, upstream fetches)
//!     → response.rs (relayed body or error envelope)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuidV4, RelayParams, X_REQUEST_ID};
pub use response::{ErrorEnvelope, X_RELAY_VIA};
pub use server::HttpServer;
