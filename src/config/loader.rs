//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::RedirectConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<RedirectConfig, ConfigError> {
    let config: RedirectConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<RedirectConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::LogFormat;
    use crate::engine::{QueryEncoding, RedirectStatus};
    use crate::routing::PrefixMatch;

    const FULL: &str = r#"
version = 1
canonical_domain = "www.example.com"

[query]
encoding = "component"

[matching]
prefix_match = "segment"

[observability]
log_format = "json"

[[rules]]
host = "docs.example.com"
default_segment = "docs"
prefix_exceptions = ["/blog", "/api"]

[[rules]]
host = "old.example.com"
default_segment = "archive"
status = 302
target_domain = "archive.example.com"
"#;

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(FULL).unwrap();
        assert_eq!(config.query.encoding, QueryEncoding::Component);
        assert_eq!(config.matching.prefix_match, PrefixMatch::Segment);
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert_eq!(config.listener.request_timeout_secs, 5);
        assert_eq!(config.rules.len(), 2);
        assert_eq!(config.rules[0].status, RedirectStatus::MovedPermanently);
        assert_eq!(config.rules[1].status, RedirectStatus::Found);
        assert_eq!(
            config.rules[1].target_domain.as_deref(),
            Some("archive.example.com")
        );
        assert!(config.rules[1].prefix_exceptions.is_empty());
    }

    #[test]
    fn test_unsupported_status_is_a_parse_error() {
        let toml = r#"
[[rules]]
host = "docs.example.com"
default_segment = "docs"
status = 307
"#;
        assert!(matches!(parse_config(toml), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_validation_error_message_lists_every_problem() {
        let toml = r#"
version = 3
"#;
        let err = parse_config(toml).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation failed: unsupported config version 3 (expected 1), no redirect rules configured"
        );
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/redirect.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
