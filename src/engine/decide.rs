//! The redirect decision.

use crate::config::validation::validate_config;
use crate::config::{ConfigError, RedirectConfig};
use crate::engine::query::{serialize, QueryEncoding};
use crate::engine::types::{QueryString, Redirect};
use crate::error::RedirectError;
use crate::routing::RoutingTable;

/// Pure `(host, path, query) -> Redirect` decision over an injected rule table.
///
/// Holds no mutable state; share it behind an `Arc` and call [`decide`]
/// from any number of tasks.
///
/// [`decide`]: RedirectEngine::decide
#[derive(Debug)]
pub struct RedirectEngine {
    table: RoutingTable,
    encoding: QueryEncoding,
}

impl RedirectEngine {
    pub fn new(table: RoutingTable, encoding: QueryEncoding) -> Self {
        Self { table, encoding }
    }

    /// Validate `config` and compile its rules.
    pub fn from_config(config: &RedirectConfig) -> Result<Self, ConfigError> {
        validate_config(config).map_err(ConfigError::Validation)?;
        Ok(Self::new(
            RoutingTable::from_config(config),
            config.query.encoding,
        ))
    }

    /// Engine over the canonical table for `domain`, raw query encoding.
    pub fn canonical(domain: &str) -> Self {
        Self::new(RoutingTable::canonical(domain), QueryEncoding::Raw)
    }

    pub fn table(&self) -> &RoutingTable {
        &self.table
    }

    pub fn encoding(&self) -> QueryEncoding {
        self.encoding
    }

    /// Compute the redirect for one request.
    ///
    /// `path` is used verbatim: the default segment is inserted by plain
    /// concatenation, so `/` becomes `/docs/` and nothing is normalized.
    pub fn decide(
        &self,
        host: &str,
        path: &str,
        query: &QueryString,
    ) -> Result<Redirect, RedirectError> {
        let rule = self.table.lookup(host)?;

        let mut location = String::with_capacity(
            "https://".len()
                + rule.target_domain().len()
                + rule.default_segment().len()
                + path.len()
                + 2,
        );
        location.push_str("https://");
        location.push_str(rule.target_domain());
        if !rule.is_exception(path) {
            location.push('/');
            location.push_str(rule.default_segment());
        }
        location.push_str(path);

        let serialized = serialize(query, self.encoding);
        if !serialized.is_empty() {
            location.push('?');
            location.push_str(&serialized);
        }

        tracing::debug!(
            host = %host,
            path = %path,
            location = %location,
            status = rule.status().code(),
            "Redirect decided"
        );

        Ok(Redirect {
            status: rule.status(),
            location,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleConfig;
    use crate::engine::types::{QueryValue, RedirectStatus};
    use crate::routing::PrefixMatch;

    fn engine() -> RedirectEngine {
        RedirectEngine::canonical("example.com")
    }

    fn location(host: &str, path: &str) -> String {
        engine().decide(host, path, &QueryString::new()).unwrap().location
    }

    #[test]
    fn test_docs_root_gets_segment() {
        let redirect = engine().decide("docs.example.com", "/", &QueryString::new()).unwrap();
        assert_eq!(redirect.status_code(), 301);
        assert_eq!(redirect.status_description(), "Moved Permanently");
        assert_eq!(redirect.location, "https://www.example.com/docs/");
    }

    #[test]
    fn test_docs_exceptions_keep_path() {
        for path in [
            "/blog/12/93/a-blog-post",
            "/api/test",
            "/contributing/foo",
            "/terms-and-policies",
        ] {
            assert_eq!(
                location("docs.example.com", path),
                format!("https://www.example.com{path}")
            );
        }
    }

    #[test]
    fn test_naive_prefix_looseness_is_preserved() {
        assert_eq!(
            location("docs.example.com", "/blogger"),
            "https://www.example.com/blogger"
        );
    }

    #[test]
    fn test_learn_and_play() {
        assert_eq!(location("learn.example.com", "/"), "https://www.example.com/learn/");
        assert_eq!(location("learn.example.com", "/learn"), "https://www.example.com/learn");
        assert_eq!(
            location("learn.example.com", "/a-nested-path"),
            "https://www.example.com/learn/a-nested-path"
        );
        assert_eq!(location("play.example.com", "/"), "https://www.example.com/play/");
        assert_eq!(location("play.example.com", "/play"), "https://www.example.com/play");
        assert_eq!(
            location("play.example.com", "/a-nested-path"),
            "https://www.example.com/play/a-nested-path"
        );
    }

    #[test]
    fn test_no_slash_normalization() {
        assert_eq!(
            location("docs.example.com", "//double//slashes/"),
            "https://www.example.com/docs//double//slashes/"
        );
    }

    #[test]
    fn test_query_appended_once() {
        let query: QueryString = [
            ("foo", QueryValue::single("bar")),
            ("baz", QueryValue::single("qux")),
        ]
        .into_iter()
        .collect();
        let redirect = engine().decide("docs.example.com", "/a-doc-page", &query).unwrap();
        assert_eq!(
            redirect.location,
            "https://www.example.com/docs/a-doc-page?foo=bar&baz=qux"
        );
        assert_eq!(redirect.location.matches('?').count(), 1);
    }

    #[test]
    fn test_empty_query_adds_no_question_mark() {
        assert!(!location("play.example.com", "/x").contains('?'));
    }

    #[test]
    fn test_unknown_host() {
        let err = engine()
            .decide("unknown.example", "/", &QueryString::new())
            .unwrap_err();
        assert_eq!(err, RedirectError::UnknownHost("unknown.example".into()));
    }

    #[test]
    fn test_query_that_serializes_to_nothing_adds_no_question_mark() {
        let query: QueryString = [("a", QueryValue::Multi { multi_value: vec![] })]
            .into_iter()
            .collect();
        let redirect = engine().decide("docs.example.com", "/x", &query).unwrap();
        assert_eq!(redirect.location, "https://www.example.com/docs/x");
    }

    #[test]
    fn test_decision_is_repeatable() {
        let query = QueryString::parse_raw("a=1&b=2&a=3");
        let engine = engine();
        let first = engine.decide("docs.example.com", "/x", &query).unwrap();
        let second = engine.decide("docs.example.com", "/x", &query).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_engine_from_config_uses_rule_status_and_encoding() {
        let mut config = RedirectConfig::canonical("example.com");
        config.query.encoding = QueryEncoding::Component;
        config.matching.prefix_match = PrefixMatch::Segment;
        config.rules.push(RuleConfig {
            host: "beta.example.com".into(),
            default_segment: "beta".into(),
            prefix_exceptions: vec!["/beta".into()],
            status: RedirectStatus::Found,
            target_domain: Some("preview.example.com".into()),
        });
        let engine = RedirectEngine::from_config(&config).unwrap();

        let query = QueryString::parse_raw("q=a b");
        let redirect = engine.decide("beta.example.com", "/page", &query).unwrap();
        assert_eq!(redirect.status, RedirectStatus::Found);
        assert_eq!(redirect.status_description(), "Found");
        assert_eq!(redirect.location, "https://preview.example.com/beta/page?q=a%20b");

        // Segment matching no longer treats /blogger as a /blog exception
        let redirect = engine
            .decide("docs.example.com", "/blogger", &QueryString::new())
            .unwrap();
        assert_eq!(redirect.location, "https://www.example.com/docs/blogger");
    }

    #[test]
    fn test_engine_from_invalid_config() {
        let mut config = RedirectConfig::canonical("example.com");
        config.rules.clear();
        assert!(matches!(
            RedirectEngine::from_config(&config),
            Err(ConfigError::Validation(_))
        ));
    }
}
