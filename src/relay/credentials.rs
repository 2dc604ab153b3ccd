//! Server-held credential injection for finance-data APIs.
//!
//! Runs before any fetch. Returns a new URL string and never touches the caller's
//! input. Targets that already carry a non-empty token pass through byte-for-byte.

use url::{form_urlencoded, Url};

use crate::config::{CredentialRule, CredentialSource};
use crate::routing::matcher::{HostMatcher, Matcher, Target};

#[derive(Debug)]
struct CompiledRule {
    host: HostMatcher,
    query_param: String,
    source: CredentialSource,
}

/// Adds configured access tokens to matching target URLs.
#[derive(Debug, Default)]
pub struct CredentialInjector {
    rules: Vec<CompiledRule>,
}

impl CredentialInjector {
    pub fn new(rules: &[CredentialRule]) -> Self {
        Self {
            rules: rules
                .iter()
                .map(|rule| CompiledRule {
                    host: HostMatcher::new(rule.host.clone()),
                    query_param: rule.query_param.clone(),
                    source: rule.source.clone(),
                })
                .collect(),
        }
    }

    /// Return `target` with a credential added when a rule requires one.
    pub fn inject(&self, target: &str) -> String {
        let parsed = Target::parse(target);
        let Some(rule) = self.rules.iter().find(|r| r.host.matches(&parsed)) else {
            return target.to_string();
        };

        let Ok(mut url) = Url::parse(target) else {
            return target.to_string();
        };

        let mut has_empty = false;
        for (key, value) in url.query_pairs() {
            if key == rule.query_param.as_str() {
                if !value.is_empty() {
                    return target.to_string();
                }
                has_empty = true;
            }
        }

        let Some(credential) = resolve(&rule.source) else {
            tracing::debug!(
                param = %rule.query_param,
                "No credential configured for target host, forwarding unchanged"
            );
            return target.to_string();
        };

        if has_empty {
            // Drop only the blank placeholder; other pairs keep their original bytes
            let kept = url.query().map(|query| {
                query
                    .split('&')
                    .filter(|pair| !is_blank_pair(pair, &rule.query_param))
                    .collect::<Vec<_>>()
                    .join("&")
            });
            url.set_query(kept.as_deref().filter(|q| !q.is_empty()));
        }
        url.query_pairs_mut()
            .append_pair(&rule.query_param, &credential);

        tracing::debug!(param = %rule.query_param, "Injected server-held credential");
        url.into()
    }
}

/// Whether a raw `key=value` segment is `param` with an empty value.
fn is_blank_pair(pair: &str, param: &str) -> bool {
    form_urlencoded::parse(pair.as_bytes())
        .next()
        .is_some_and(|(key, value)| key == param && value.is_empty())
}

/// Read the credential; empty values count as absent.
fn resolve(source: &CredentialSource) -> Option<String> {
    let value = match source {
        CredentialSource::Env(var) => std::env::var(var).ok()?,
        CredentialSource::Static(value) => value.clone(),
    };
    (!value.is_empty()).then_some(value)
}
