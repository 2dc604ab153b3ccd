//! The relay engine: inject credentials, plan strategies, try them in order.
//!
//! Attempts run strictly one after another. The first 2xx wins and its body is
//! buffered in full before anything is returned. Every failure is logged and
//! swallowed; only the most recent one survives as the `details` hint.

use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::{Bytes, BytesMut};
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, CONTENT_TYPE, PRAGMA,
    USER_AGENT,
};
use reqwest::{Client, Url};

use crate::config::{CacheConfig, RelayConfig, TimeoutConfig};
use crate::observability::metrics;
use crate::relay::credentials::CredentialInjector;
use crate::relay::types::{AttemptError, RelayError, RelayResult, RelayedResponse};
use crate::resilience::timeouts::with_deadline;
use crate::routing::{Router, Strategy};

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const BROWSER_ACCEPT: &str = "application/json, text/plain, */*";
const BROWSER_ACCEPT_LANGUAGE: &str = "zh-CN,zh;q=0.9,en;q=0.8";

const DIRECT_CONTENT_TYPE: &str = "application/json";
const FALLBACK_CONTENT_TYPE: &str = "text/plain";

/// Headers that make an upstream treat the relay like a regular browser.
fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static(BROWSER_ACCEPT_LANGUAGE),
    );
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    headers
}

/// Body and content type of a successful attempt.
#[derive(Debug)]
struct Fetched {
    content_type: Option<String>,
    body: Bytes,
}

struct Inner {
    router: Router,
    credentials: CredentialInjector,
    client: Client,
    timeouts: TimeoutConfig,
    cache: CacheConfig,
    max_body_bytes: usize,
}

/// Relay engine shared by all handlers. Cloning is cheap.
#[derive(Clone)]
pub struct Relay {
    inner: Arc<Inner>,
}

impl Relay {
    /// Compile rules and build the outbound client.
    pub fn new(config: &RelayConfig) -> reqwest::Result<Self> {
        let mut builder = Client::builder();
        if !config.relay.use_system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build()?;

        Ok(Self {
            inner: Arc::new(Inner {
                router: Router::from_config(&config.relay),
                credentials: CredentialInjector::new(&config.relay.credentials),
                client,
                timeouts: config.timeouts.clone(),
                cache: config.cache.clone(),
                max_body_bytes: config.relay.max_body_bytes,
            }),
        })
    }

    /// Strategies that would run for `target`, after credential injection.
    pub fn plan(&self, target: &str) -> Vec<Strategy> {
        let target = self.inner.credentials.inject(target);
        self.inner.router.plan(&target)
    }

    /// Relay `target`, returning the first successful upstream response.
    pub async fn relay(&self, target: &str) -> RelayResult<RelayedResponse> {
        if target.is_empty() {
            return Err(RelayError::MissingParameter);
        }

        let target = self.inner.credentials.inject(target);
        let mut last_error: Option<AttemptError> = None;

        for strategy in self.inner.router.plan(&target) {
            let started = Instant::now();
            match self.attempt(&strategy, &target).await {
                Ok(fetched) => {
                    metrics::record_attempt(strategy.label(), true);
                    tracing::debug!(
                        strategy = %strategy,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        bytes = fetched.body.len(),
                        "Relay attempt succeeded"
                    );
                    return Ok(self.respond(&strategy, fetched));
                }
                Err(e) => {
                    metrics::record_attempt(strategy.label(), false);
                    tracing::warn!(
                        strategy = %strategy,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        error = %e,
                        "Relay attempt failed, trying next"
                    );
                    last_error = Some(e);
                }
            }
        }

        tracing::error!(url = %target, "All relay strategies failed");
        Err(RelayError::AllStrategiesExhausted {
            details: last_error.map(|e| e.to_string()),
        })
    }

    async fn attempt(&self, strategy: &Strategy, target: &str) -> Result<Fetched, AttemptError> {
        let timeouts = &self.inner.timeouts;
        let (url, browser_like, limit) = match strategy {
            Strategy::Direct => (target.to_string(), true, timeouts.direct_ms),
            Strategy::Pool { template, .. } => (template.build(target), true, timeouts.pool_ms),
            Strategy::LastResort => (target.to_string(), false, timeouts.last_resort_ms),
        };

        let url = Url::parse(&url).map_err(|e| AttemptError::InvalidUrl {
            url: url.clone(),
            reason: e.to_string(),
        })?;

        let mut request = self.inner.client.get(url);
        if browser_like {
            request = request.headers(browser_headers());
        }

        with_deadline(
            Duration::from_millis(limit),
            self.fetch(request),
            AttemptError::Timeout,
        )
        .await
    }

    async fn fetch(&self, request: reqwest::RequestBuilder) -> Result<Fetched, AttemptError> {
        let mut response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AttemptError::Status(status));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        let limit = self.inner.max_body_bytes;
        if response.content_length().is_some_and(|len| len > limit as u64) {
            return Err(AttemptError::BodyTooLarge { limit });
        }

        let mut body = BytesMut::new();
        while let Some(chunk) = response.chunk().await? {
            if body.len() + chunk.len() > limit {
                return Err(AttemptError::BodyTooLarge { limit });
            }
            body.extend_from_slice(&chunk);
        }

        Ok(Fetched {
            content_type,
            body: body.freeze(),
        })
    }

    fn respond(&self, strategy: &Strategy, fetched: Fetched) -> RelayedResponse {
        let cache = &self.inner.cache;
        let (default_type, cache_max_age) = match strategy {
            Strategy::Direct => (DIRECT_CONTENT_TYPE, cache.direct_max_age_secs),
            Strategy::Pool { .. } => (FALLBACK_CONTENT_TYPE, cache.pool_max_age_secs),
            Strategy::LastResort => (FALLBACK_CONTENT_TYPE, None),
        };

        RelayedResponse {
            content_type: fetched
                .content_type
                .unwrap_or_else(|| default_type.to_string()),
            cache_max_age,
            served_by: strategy.to_string(),
            body: fetched.body,
        }
    }
}
