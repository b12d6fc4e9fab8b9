//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the redirect
//! engine and its local edge emulator. All types derive Serde traits for
//! deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::engine::{QueryEncoding, RedirectStatus};
use crate::routing::PrefixMatch;

/// Schema version understood by this build.
pub const CONFIG_VERSION: u32 = 1;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RedirectConfig {
    /// Schema version of the rule table.
    pub version: u32,

    /// Domain every rule redirects to unless it names its own target.
    pub canonical_domain: String,

    /// Emulator listener settings.
    pub listener: ListenerConfig,

    /// Query-string serialization policy.
    pub query: QueryConfig,

    /// Exception prefix matching policy.
    pub matching: MatchingConfig,

    /// Edge function budget settings.
    pub edge: EdgeConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Host rules, one per legacy subdomain.
    pub rules: Vec<RuleConfig>,
}

impl Default for RedirectConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            canonical_domain: "www.example.com".to_string(),
            listener: ListenerConfig::default(),
            query: QueryConfig::default(),
            matching: MatchingConfig::default(),
            edge: EdgeConfig::default(),
            observability: ObservabilityConfig::default(),
            rules: Vec::new(),
        }
    }
}

impl RedirectConfig {
    /// The `docs.` / `learn.` / `play.` rule set redirecting to `www.<domain>`.
    pub fn canonical(domain: &str) -> Self {
        Self {
            canonical_domain: format!("www.{domain}"),
            rules: vec![
                RuleConfig::new(
                    format!("docs.{domain}"),
                    "docs",
                    &["/blog", "/contributing", "/terms-and-policies", "/api"],
                ),
                RuleConfig::new(format!("learn.{domain}"), "learn", &["/learn"]),
                RuleConfig::new(format!("play.{domain}"), "play", &["/play"]),
            ],
            ..Self::default()
        }
    }
}

/// One host rule.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct RuleConfig {
    /// Legacy host to match (case-insensitive, exact).
    pub host: String,

    /// Segment inserted in front of paths that are not exceptions.
    pub default_segment: String,

    /// Path prefixes that already point at canonical site structure.
    #[serde(default)]
    pub prefix_exceptions: Vec<String>,

    /// Redirect status (301 or 302).
    #[serde(default)]
    pub status: RedirectStatus,

    /// Overrides `canonical_domain` for this rule.
    #[serde(default)]
    pub target_domain: Option<String>,
}

impl RuleConfig {
    pub fn new(
        host: impl Into<String>,
        default_segment: impl Into<String>,
        exceptions: &[&str],
    ) -> Self {
        Self {
            host: host.into(),
            default_segment: default_segment.into(),
            prefix_exceptions: exceptions.iter().map(|e| e.to_string()).collect(),
            status: RedirectStatus::MovedPermanently,
            target_domain: None,
        }
    }
}

/// Listener configuration for the local edge emulator.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:8080").
    pub bind_address: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
            request_timeout_secs: 5,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct QueryConfig {
    /// `raw` copies keys and values, `component` percent-encodes them.
    pub encoding: QueryEncoding,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct MatchingConfig {
    /// `naive` string-prefix test, or `segment` boundary-aware matching.
    pub prefix_match: PrefixMatch,
}

/// Edge function budget.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct EdgeConfig {
    /// Compute time allotted to one invocation, in microseconds.
    pub compute_budget_micros: u64,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            compute_budget_micros: 1_000,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Pretty output for development, JSON for log shipping.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
