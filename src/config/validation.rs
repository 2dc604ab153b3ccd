//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, address parses)
//! - Check proxy templates and rules are usable
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RelayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::{CredentialSource, RelayConfig};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Check a parsed configuration for semantic errors.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    let timeouts = &config.timeouts;
    for (field, value) in [
        ("timeouts.request_secs", timeouts.request_secs),
        ("timeouts.direct_ms", timeouts.direct_ms),
        ("timeouts.pool_ms", timeouts.pool_ms),
        ("timeouts.last_resort_ms", timeouts.last_resort_ms),
    ] {
        if value == 0 {
            errors.push(ValidationError::new(field, "must be greater than zero"));
        }
    }

    for (i, template) in config.relay.proxy_pool.iter().enumerate() {
        if !(template.starts_with("http://") || template.starts_with("https://")) {
            errors.push(ValidationError::new(
                format!("relay.proxy_pool[{}]", i),
                format!("'{}' must start with http:// or https://", template),
            ));
        }
    }

    for (i, rule) in config.relay.direct_rules.iter().enumerate() {
        if rule.pattern.is_empty() {
            errors.push(ValidationError::new(
                format!("relay.direct_rules[{}].pattern", i),
                "must not be empty",
            ));
        }
    }

    for (i, rule) in config.relay.credentials.iter().enumerate() {
        if rule.host.is_empty() {
            errors.push(ValidationError::new(
                format!("relay.credentials[{}].host", i),
                "must not be empty",
            ));
        }
        if rule.query_param.is_empty() {
            errors.push(ValidationError::new(
                format!("relay.credentials[{}].query_param", i),
                "must not be empty",
            ));
        }
        if let CredentialSource::Env(var) = &rule.source {
            if var.is_empty() {
                errors.push(ValidationError::new(
                    format!("relay.credentials[{}].source", i),
                    "environment variable name must not be empty",
                ));
            }
        }
    }

    if config.relay.max_body_bytes == 0 {
        errors.push(ValidationError::new(
            "relay.max_body_bytes",
            "must be greater than zero",
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!(
                "'{}' is not a socket address",
                config.observability.metrics_address
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{CredentialRule, DirectRule, MatchKind};

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&RelayConfig::default()), Ok(()));
    }

    #[test]
    fn test_reports_every_error() {
        let mut config = RelayConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.timeouts.pool_ms = 0;
        config.relay.proxy_pool.push("ftp://proxy.example/".into());
        config
            .relay
            .direct_rules
            .push(DirectRule::new(MatchKind::Contains, ""));
        config.relay.credentials.push(CredentialRule {
            host: "api.example".into(),
            query_param: String::new(),
            source: CredentialSource::Env(String::new()),
        });

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "listener.bind_address",
                "timeouts.pool_ms",
                "relay.proxy_pool[5]",
                "relay.direct_rules[8].pattern",
                "relay.credentials[2].query_param",
                "relay.credentials[2].source",
            ]
        );
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = RelayConfig::default();
        config.observability.metrics_address = "nowhere".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "observability.metrics_address");
    }
}
