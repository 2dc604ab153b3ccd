//! CORS-proxy templates.
//!
//! A template is a base URL the target gets appended to. Templates that carry a
//! query string (`?url=`) expect the target as a percent-encoded value; path-style
//! templates (`/fetch/`) expect the raw target.

use std::fmt;

/// One entry of the proxy pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyTemplate {
    base: String,
}

impl ProxyTemplate {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Whether the target is passed as a query value.
    pub fn encodes_target(&self) -> bool {
        self.base.contains('?')
    }

    /// Build the URL that asks this proxy for `target`.
    pub fn build(&self, target: &str) -> String {
        if self.encodes_target() {
            format!("{}{}", self.base, urlencoding::encode(target))
        } else {
            format!("{}{}", self.base, target)
        }
    }
}

impl fmt::Display for ProxyTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base)
    }
}

/// Build the ordered pool from configured template strings.
pub fn pool_from_config(templates: &[String]) -> Vec<ProxyTemplate> {
    templates.iter().map(ProxyTemplate::new).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TARGET: &str = "https://api.example.com/v1/quote?symbol=AAPL&token=x y";

    #[test]
    fn test_query_template_encodes_target() {
        let template = ProxyTemplate::new("https://api.allorigins.win/raw?url=");
        assert!(template.encodes_target());
        assert_eq!(
            template.build(TARGET),
            "https://api.allorigins.win/raw?url=https%3A%2F%2Fapi.example.com%2Fv1%2Fquote%3Fsymbol%3DAAPL%26token%3Dx%20y"
        );
    }

    #[test]
    fn test_path_template_appends_raw_target() {
        let template = ProxyTemplate::new("https://thingproxy.freeboard.io/fetch/");
        assert!(!template.encodes_target());
        assert_eq!(
            template.build(TARGET),
            format!("https://thingproxy.freeboard.io/fetch/{}", TARGET)
        );
    }

    #[test]
    fn test_pool_keeps_order() {
        let pool = pool_from_config(&[
            "https://a.example/?u=".to_string(),
            "https://b.example/".to_string(),
        ]);
        assert_eq!(pool[0].base(), "https://a.example/?u=");
        assert_eq!(pool[1].to_string(), "https://b.example/");
    }
}
