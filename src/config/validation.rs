//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic, including status codes)
//! - Check domains parse as URL hosts
//! - Detect duplicate host rules
//! - Validate value ranges (timeouts > 0, budget > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RedirectConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;

use thiserror::Error;
use url::Url;

use crate::config::schema::{RedirectConfig, CONFIG_VERSION};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("unsupported config version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("no redirect rules configured")]
    NoRules,

    #[error("{field} is empty")]
    EmptyDomain { field: String },

    #[error("{field} `{value}` is not a valid host name")]
    InvalidDomain { field: String, value: String },

    #[error("duplicate rule for host `{0}`")]
    DuplicateHost(String),

    #[error("rule `{host}` has an empty default segment")]
    EmptySegment { host: String },

    #[error("rule `{host}` default segment `{segment}` must not contain `/`")]
    SegmentContainsSlash { host: String, segment: String },

    #[error("rule `{host}` exception `{prefix}` must start with `/`")]
    RelativeException { host: String, prefix: String },

    #[error("listener.request_timeout_secs must be greater than zero")]
    ZeroTimeout,

    #[error("edge.compute_budget_micros must be greater than zero")]
    ZeroComputeBudget,
}

/// Validate a parsed configuration, collecting every problem found.
pub fn validate_config(config: &RedirectConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.version != CONFIG_VERSION {
        errors.push(ValidationError::UnsupportedVersion {
            found: config.version,
            expected: CONFIG_VERSION,
        });
    }

    check_domain("canonical_domain", &config.canonical_domain, &mut errors);

    if config.rules.is_empty() {
        errors.push(ValidationError::NoRules);
    }

    let mut seen = HashSet::new();
    for (index, rule) in config.rules.iter().enumerate() {
        check_domain(&format!("rules[{index}].host"), &rule.host, &mut errors);

        if !seen.insert(rule.host.to_ascii_lowercase()) {
            errors.push(ValidationError::DuplicateHost(rule.host.clone()));
        }

        if rule.default_segment.is_empty() {
            errors.push(ValidationError::EmptySegment {
                host: rule.host.clone(),
            });
        } else if rule.default_segment.contains('/') {
            errors.push(ValidationError::SegmentContainsSlash {
                host: rule.host.clone(),
                segment: rule.default_segment.clone(),
            });
        }

        for prefix in &rule.prefix_exceptions {
            if !prefix.starts_with('/') {
                errors.push(ValidationError::RelativeException {
                    host: rule.host.clone(),
                    prefix: prefix.clone(),
                });
            }
        }

        if let Some(target) = &rule.target_domain {
            check_domain(&format!("rules[{index}].target_domain"), target, &mut errors);
        }
    }

    if config.listener.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if config.edge.compute_budget_micros == 0 {
        errors.push(ValidationError::ZeroComputeBudget);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// A domain is valid when `https://<domain>/` parses with exactly that host.
fn check_domain(field: &str, value: &str, errors: &mut Vec<ValidationError>) {
    if value.is_empty() {
        errors.push(ValidationError::EmptyDomain {
            field: field.to_string(),
        });
        return;
    }

    let parsed_host = Url::parse(&format!("https://{value}/"))
        .ok()
        .and_then(|url| url.host_str().map(str::to_string));

    match parsed_host {
        Some(host) if host.eq_ignore_ascii_case(value) => {}
        _ => errors.push(ValidationError::InvalidDomain {
            field: field.to_string(),
            value: value.to_string(),
        }),
    }
}
