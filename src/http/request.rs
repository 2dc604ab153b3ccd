//! Request identification and query extraction.
//!
//! # Responsibilities
//! - Generate unique request ID (UUID v4) when the caller sent none
//! - Expose the request ID to handlers for log correlation
//! - Define the relay endpoint's query parameters

use axum::http::{HeaderMap, HeaderName, HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use url::form_urlencoded;
use uuid::Uuid;

/// Header carrying the request ID in both directions.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Generates a fresh UUID v4 for each request lacking `x-request-id`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV4;

impl MakeRequestId for MakeRequestUuidV4 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Request ID of an inbound request, or `"unknown"`.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Query parameters of `GET /api/proxy`.
#[derive(Debug, Default)]
pub struct RelayParams {
    /// Target URL to relay.
    pub url: Option<String>,
}

impl RelayParams {
    /// Read the raw query string. The first `url` pair wins; other keys and
    /// repeats are ignored.
    pub fn from_query(query: Option<&str>) -> Self {
        let url = query.and_then(|q| {
            form_urlencoded::parse(q.as_bytes())
                .find(|(key, _)| key == "url")
                .map(|(_, value)| value.into_owned())
        });
        Self { url }
    }

    /// The target, treating an empty value as absent.
    pub fn target(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| !u.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_generates_uuid() {
        let request = Request::builder().body(Body::empty()).unwrap();
        let id = MakeRequestUuidV4.make_request_id(&request).unwrap();
        let text = id.header_value().to_str().unwrap();
        assert!(Uuid::parse_str(text).is_ok());
    }

    #[test]
    fn test_request_id_lookup() {
        let mut headers = HeaderMap::new();
        assert_eq!(request_id(&headers), "unknown");
        headers.insert(X_REQUEST_ID, HeaderValue::from_static("abc-123"));
        assert_eq!(request_id(&headers), "abc-123");
    }

    #[test]
    fn test_empty_target_is_absent() {
        let params = RelayParams { url: Some(String::new()) };
        assert_eq!(params.target(), None);
        let params = RelayParams {
            url: Some("https://example.com".into()),
        };
        assert_eq!(params.target(), Some("https://example.com"));
    }

    #[test]
    fn test_first_url_pair_wins() {
        let params = RelayParams::from_query(Some(
            "url=https%3A%2F%2Fa.example%2Fx%3Fy%3D1&url=https://b.example&cb=7",
        ));
        assert_eq!(params.target(), Some("https://a.example/x?y=1"));

        assert_eq!(RelayParams::from_query(Some("cb=7")).target(), None);
        let blank_first = RelayParams::from_query(Some("url=&url=https://b.example"));
        assert_eq!(blank_first.target(), None);
        assert_eq!(RelayParams::from_query(None).target(), None);
    }
}
