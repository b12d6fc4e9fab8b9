//! Path matching logic for prefix exceptions.
//!
//! # Responsibilities
//! - Match a request path against a configured prefix
//! - Combine a rule's exception prefixes with OR semantics
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - Naive mode is a plain string-prefix test: `/blog` matches `/blogger`
//! - Segment mode only matches on a `/` (or `?`) boundary and must be opted into
//! - No regex to guarantee O(n) matching

use serde::{Deserialize, Serialize};

/// Trait for matching a request path against a condition.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the path matches this condition.
    fn matches(&self, path: &str) -> bool;
}

/// How exception prefixes are compared with the request path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrefixMatch {
    /// `path.starts_with(prefix)`.
    #[default]
    Naive,
    /// Prefix must end on a path segment boundary.
    Segment,
}

/// Matches the request path prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPrefixMatcher {
    prefix: String,
    mode: PrefixMatch,
}

impl PathPrefixMatcher {
    /// Create a new path prefix matcher.
    pub fn new(prefix: impl Into<String>, mode: PrefixMatch) -> Self {
        Self {
            prefix: prefix.into(),
            mode,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Matcher for PathPrefixMatcher {
    fn matches(&self, path: &str) -> bool {
        let Some(rest) = path.strip_prefix(self.prefix.as_str()) else {
            return false;
        };
        match self.mode {
            PrefixMatch::Naive => true,
            PrefixMatch::Segment => {
                rest.is_empty()
                    || self.prefix.ends_with('/')
                    || rest.starts_with('/')
                    || rest.starts_with('?')
            }
        }
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

    /// Build from a list of path prefixes sharing one match mode.
    pub fn prefixes<I, S>(prefixes: I, mode: PrefixMatch) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            prefixes
                .into_iter()
                .map(|p| Box::new(PathPrefixMatcher::new(p, mode)) as Box<dyn Matcher>)
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}

impl Matcher for AnyMatcher {
    fn matches(&self, path: &str) -> bool {
        // An empty set never matches
        self.matchers.iter().any(|m| m.matches(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_naive_prefix_matcher() {
        let matcher = PathPrefixMatcher::new("/blog", PrefixMatch::Naive);

        assert!(matcher.matches("/blog"));
        assert!(matcher.matches("/blog/12/93/a-blog-post"));
        assert!(matcher.matches("/blogger")); // not segment aware
        assert!(!matcher.matches("/docs/blog"));
        assert!(!matcher.matches("/Blog")); // case sensitive
    }

    #[test]
    fn test_segment_prefix_matcher() {
        let matcher = PathPrefixMatcher::new("/blog", PrefixMatch::Segment);

        assert!(matcher.matches("/blog"));
        assert!(matcher.matches("/blog/"));
        assert!(matcher.matches("/blog/12/93/a-blog-post"));
        assert!(matcher.matches("/blog?page=2"));
        assert!(!matcher.matches("/blogger"));
    }

    #[test]
    fn test_any_matcher() {
        let matcher = AnyMatcher::prefixes(["/api", "/contributing"], PrefixMatch::Naive);
        assert!(matcher.matches("/api/test"));
        assert!(matcher.matches("/contributing/foo"));
        assert!(!matcher.matches("/a-doc-page"));

        let empty = AnyMatcher::default();
        assert!(empty.is_empty());
        assert!(!empty.matches("/anything"));
    }
}
