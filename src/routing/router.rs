//! Host lookup over the compiled rule set.
//!
//! # Responsibilities
//! - Store compiled routing rules
//! - Look up the rule for a request host
//! - Return the matched rule or an explicit unknown-host error
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(1) host lookup via HashMap, keys lowercased
//! - Explicit UnknownHost rather than a silent default

use std::collections::HashMap;

use crate::config::{RedirectConfig, RuleConfig};
use crate::engine::RedirectStatus;
use crate::error::RedirectError;
use crate::routing::matcher::{AnyMatcher, Matcher, PrefixMatch};

/// One compiled host rule.
#[derive(Debug)]
pub struct RoutingRule {
    host: String,
    exceptions: AnyMatcher,
    exception_prefixes: Vec<String>,
    default_segment: String,
    target_domain: String,
    status: RedirectStatus,
}

impl RoutingRule {
    pub fn new(
        host: impl Into<String>,
        default_segment: impl Into<String>,
        exception_prefixes: Vec<String>,
        target_domain: impl Into<String>,
        status: RedirectStatus,
        mode: PrefixMatch,
    ) -> Self {
        Self {
            host: host.into().to_ascii_lowercase(),
            exceptions: AnyMatcher::prefixes(exception_prefixes.iter().cloned(), mode),
            exception_prefixes,
            default_segment: default_segment.into(),
            target_domain: target_domain.into(),
            status,
        }
    }

    fn from_config(rule: &RuleConfig, canonical_domain: &str, mode: PrefixMatch) -> Self {
        Self::new(
            rule.host.clone(),
            rule.default_segment.clone(),
            rule.prefix_exceptions.clone(),
            rule.target_domain
                .clone()
                .unwrap_or_else(|| canonical_domain.to_string()),
            rule.status,
            mode,
        )
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn default_segment(&self) -> &str {
        &self.default_segment
    }

    pub fn exception_prefixes(&self) -> &[String] {
        &self.exception_prefixes
    }

    pub fn target_domain(&self) -> &str {
        &self.target_domain
    }

    pub fn status(&self) -> RedirectStatus {
        self.status
    }

    /// True when `path` already points at canonical site structure.
    pub fn is_exception(&self, path: &str) -> bool {
        self.exceptions.matches(path)
    }
}

/// Immutable host → rule table.
#[derive(Debug, Default)]
pub struct RoutingTable {
    rules: Vec<RoutingRule>,
    by_host: HashMap<String, usize>,
}

impl RoutingTable {
    /// Build a table from rules. A later rule for the same host replaces an
    /// earlier one; validated configs never contain duplicates.
    pub fn new(rules: Vec<RoutingRule>) -> Self {
        let mut by_host = HashMap::with_capacity(rules.len());
        for (index, rule) in rules.iter().enumerate() {
            by_host.insert(rule.host.clone(), index);
        }
        Self { rules, by_host }
    }

    /// Compile the rules of an already validated configuration.
    pub fn from_config(config: &RedirectConfig) -> Self {
        let mode = config.matching.prefix_match;
        let rules = config
            .rules
            .iter()
            .map(|rule| RoutingRule::from_config(rule, &config.canonical_domain, mode))
            .collect();
        Self::new(rules)
    }

    /// The `docs.` / `learn.` / `play.` table for `domain`.
    pub fn canonical(domain: &str) -> Self {
        Self::from_config(&RedirectConfig::canonical(domain))
    }

    /// Find the rule for `host`, case-insensitively.
    pub fn lookup(&self, host: &str) -> Result<&RoutingRule, RedirectError> {
        self.by_host
            .get(&host.to_ascii_lowercase())
            .map(|&index| &self.rules[index])
            .ok_or_else(|| RedirectError::UnknownHost(host.to_string()))
    }

    pub fn rules(&self) -> &[RoutingRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
