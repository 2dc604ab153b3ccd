//! Target URL matching logic.
//!
//! # Responsibilities
//! - Match raw substrings of the target URL (marker rules)
//! - Match the parsed host exactly or as a parent domain
//! - Match the parsed host by suffix (TLD rules)
//! - Combine rules with OR semantics
//!
//! # Design Decisions
//! - Host matching is case-insensitive (hosts are normalized by the URL parser)
//! - Substring matching is case-sensitive and looks at the whole raw URL
//! - A target whose URL does not parse never matches a host rule
//! - No regex to guarantee O(n) matching

use url::Url;

use crate::config::{DirectRule, MatchKind};

/// A target URL with its host extracted once.
#[derive(Debug, Clone)]
pub struct Target<'a> {
    raw: &'a str,
    host: Option<String>,
}

impl<'a> Target<'a> {
    pub fn parse(raw: &'a str) -> Self {
        let host = Url::parse(raw)
            .ok()
            .and_then(|url| url.host_str().map(|h| h.to_ascii_lowercase()));
        Self { raw, host }
    }

    pub fn raw(&self) -> &str {
        self.raw
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }
}

/// Trait for matching targets against conditions.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the target matches this condition.
    fn matches(&self, target: &Target<'_>) -> bool;
}

/// Matches a raw substring anywhere in the URL.
#[derive(Debug, Clone)]
pub struct ContainsMatcher {
    needle: String,
}

impl ContainsMatcher {
    pub fn new(needle: impl Into<String>) -> Self {
        Self {
            needle: needle.into(),
        }
    }
}

impl Matcher for ContainsMatcher {
    fn matches(&self, target: &Target<'_>) -> bool {
        target.raw().contains(&self.needle)
    }
}

/// Matches a host and all of its subdomains.
#[derive(Debug, Clone)]
pub struct HostMatcher {
    expected_host: String,
}

impl HostMatcher {
    /// Create a new host matcher.
    /// The host is normalized to lowercase for case-insensitive matching.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            expected_host: host.into().to_lowercase(),
        }
    }
}

impl Matcher for HostMatcher {
    fn matches(&self, target: &Target<'_>) -> bool {
        target
            .host()
            .map(|h| {
                h == self.expected_host
                    || h.strip_suffix(self.expected_host.as_str())
                        .is_some_and(|rest| rest.ends_with('.'))
            })
            .unwrap_or(false)
    }
}

/// Matches the tail of the host, e.g. `.cn`.
#[derive(Debug, Clone)]
pub struct HostSuffixMatcher {
    suffix: String,
}

impl HostSuffixMatcher {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into().to_lowercase(),
        }
    }
}

impl Matcher for HostSuffixMatcher {
    fn matches(&self, target: &Target<'_>) -> bool {
        target
            .host()
            .map(|h| h.ends_with(&self.suffix))
            .unwrap_or(false)
    }
}

/// Combines multiple matchers with OR semantics.
#[derive(Debug, Default)]
pub struct AnyMatcher {
    matchers: Vec<Box<dyn Matcher>>,
}

impl AnyMatcher {
    pub fn new(matchers: Vec<Box<dyn Matcher>>) -> Self {
        Self { matchers }
    }

    /// Compile configured direct rules.
    pub fn from_rules(rules: &[DirectRule]) -> Self {
        Self::new(rules.iter().map(compile_rule).collect())
    }
}

impl Matcher for AnyMatcher {
    fn matches(&self, target: &Target<'_>) -> bool {
        self.matchers.iter().any(|m| m.matches(target))
    }
}

fn compile_rule(rule: &DirectRule) -> Box<dyn Matcher> {
    match rule.kind {
        MatchKind::Contains => Box::new(ContainsMatcher::new(rule.pattern.clone())),
        MatchKind::Host => Box::new(HostMatcher::new(rule.pattern.clone())),
        MatchKind::HostSuffix => Box::new(HostSuffixMatcher::new(rule.pattern.clone())),
    }
}
