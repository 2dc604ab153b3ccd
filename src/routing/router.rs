//! Strategy planning for a single relay request.

use std::fmt;

use crate::config::StrategyConfig;
use crate::relay::pool::{pool_from_config, ProxyTemplate};
use crate::routing::matcher::{AnyMatcher, Matcher, Target};

/// One way of fetching the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    /// Fetch the target itself with browser-like headers.
    Direct,
    /// Ask a proxy pool entry for the target.
    Pool {
        index: usize,
        template: ProxyTemplate,
    },
    /// Fetch the target with no special headers.
    LastResort,
}

impl Strategy {
    /// Low-cardinality label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Strategy::Direct => "direct",
            Strategy::Pool { .. } => "pool",
            Strategy::LastResort => "last_resort",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Pool { index, .. } => write!(f, "pool[{}]", index),
            other => f.write_str(other.label()),
        }
    }
}

/// Decides which strategies run, and in which order, for a target.
#[derive(Debug)]
pub struct Router {
    direct: AnyMatcher,
    pool: Vec<ProxyTemplate>,
}

impl Router {
    /// Compile rules and the pool once at startup.
    pub fn from_config(config: &StrategyConfig) -> Self {
        Self {
            direct: AnyMatcher::from_rules(&config.direct_rules),
            pool: pool_from_config(&config.proxy_pool),
        }
    }

    /// Whether the target may be fetched directly before the pool.
    pub fn is_direct(&self, target: &str) -> bool {
        self.direct.matches(&Target::parse(target))
    }

    /// Ordered strategies: direct (when whitelisted), every pool entry, last resort.
    pub fn plan(&self, target: &str) -> Vec<Strategy> {
        let mut plan = Vec::with_capacity(self.pool.len() + 2);
        if self.is_direct(target) {
            plan.push(Strategy::Direct);
        }
        plan.extend(
            self.pool
                .iter()
                .cloned()
                .enumerate()
                .map(|(index, template)| Strategy::Pool { index, template }),
        );
        plan.push(Strategy::LastResort);
        plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DirectRule, MatchKind};

    fn router() -> Router {
        Router::from_config(&StrategyConfig {
            proxy_pool: vec!["https://a.example/?url=".into(), "https://b.example/".into()],
            direct_rules: vec![
                DirectRule::new(MatchKind::Contains, "gdelt"),
                DirectRule::new(MatchKind::HostSuffix, ".cn"),
            ],
            ..StrategyConfig::default()
        })
    }

    #[test]
    fn test_whitelisted_target_goes_direct_first() {
        let plan = router().plan("https://www.gov.cn/feed.xml");
        let labels: Vec<String> = plan.iter().map(ToString::to_string).collect();
        assert_eq!(labels, vec!["direct", "pool[0]", "pool[1]", "last_resort"]);
    }

    #[test]
    fn test_other_target_skips_direct() {
        let plan = router().plan("https://example.com/feed.xml");
        assert_eq!(plan.len(), 3);
        assert!(matches!(&plan[0], Strategy::Pool { index: 0, template } if template.base() == "https://a.example/?url="));
        assert_eq!(plan[2], Strategy::LastResort);
    }

    #[test]
    fn test_empty_pool_still_has_last_resort() {
        let router = Router::from_config(&StrategyConfig {
            proxy_pool: Vec::new(),
            direct_rules: Vec::new(),
            ..StrategyConfig::default()
        });
        assert_eq!(router.plan("https://gdelt.example/"), vec![Strategy::LastResort]);
    }
}
