//! Response construction.
//!
//! # Responsibilities
//! - Turn a buffered upstream success into the client response
//! - Map relay errors to status codes and the JSON error envelope
//!
//! # Design Decisions
//! - Bodies are passed through verbatim, never re-encoded
//! - Successful responses are always 200, whatever 2xx the upstream used
//! - Error envelopes are plain JSON without CORS headers

use axum::http::header::{ACCESS_CONTROL_ALLOW_ORIGIN, CACHE_CONTROL, CONTENT_TYPE};
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::relay::{RelayError, RelayedResponse};

/// Header naming the strategy that served a relayed body.
pub const X_RELAY_VIA: HeaderName = HeaderName::from_static("x-relay-via");

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Option<String>>,
}

impl IntoResponse for RelayedResponse {
    fn into_response(self) -> Response {
        let mut response = (StatusCode::OK, self.body).into_response();
        let headers = response.headers_mut();

        let content_type = HeaderValue::from_str(&self.content_type)
            .unwrap_or_else(|_| HeaderValue::from_static("text/plain"));
        headers.insert(CONTENT_TYPE, content_type);
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));

        if let Some(max_age) = self.cache_max_age {
            if let Ok(value) = HeaderValue::from_str(&format!("public, max-age={}", max_age)) {
                headers.insert(CACHE_CONTROL, value);
            }
        }
        if let Ok(value) = HeaderValue::from_str(&self.served_by) {
            headers.insert(X_RELAY_VIA, value);
        }

        response
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let error = self.to_string();
        match self {
            RelayError::MissingParameter => (
                StatusCode::BAD_REQUEST,
                Json(ErrorEnvelope {
                    error,
                    details: None,
                }),
            )
                .into_response(),
            RelayError::AllStrategiesExhausted { details } => (
                StatusCode::BAD_GATEWAY,
                Json(ErrorEnvelope {
                    error,
                    details: Some(details),
                }),
            )
                .into_response(),
        }
    }
}
