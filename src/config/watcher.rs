//! Rule-file watcher for hot reload.
//!
//! Every change to the watched file is loaded and validated here; only rule
//! sets that pass reach the emulator, which swaps its engine on receipt.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::RedirectConfig;
use crate::observability::metrics;

/// Pushes validated rule sets from a watched file to the emulator.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<RedirectConfig>,
}

impl ConfigWatcher {
    /// Create a new ConfigWatcher.
    ///
    /// Returns the watcher and a receiver for validated configuration updates.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<RedirectConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching the file. Dropping the returned watcher stops it.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.update_tx.clone();
        let path = self.path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        if let Some(new_config) = reload_from(&path) {
                            let _ = tx.send(new_config);
                        }
                    }
                }
                Err(e) => tracing::error!(error = ?e, "Watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Config watcher started");
        Ok(watcher)
    }
}

/// Load the rule file after a change; `None` keeps the current rules.
fn reload_from(path: &Path) -> Option<RedirectConfig> {
    tracing::info!(path = ?path, "Rule file change detected, reloading");
    match load_config(path) {
        Ok(config) => {
            tracing::debug!(rules = config.rules.len(), "Rule file validated");
            Some(config)
        }
        Err(e) => {
            metrics::record_config_reload(false);
            tracing::error!(error = %e, "Failed to reload rules, keeping current rules");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_reload_from_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
canonical_domain = "www.example.org"

[[rules]]
host = "docs.example.org"
default_segment = "docs"
"#
        )
        .unwrap();

        let config = reload_from(file.path()).unwrap();
        assert_eq!(config.rules.len(), 1);
        assert_eq!(config.rules[0].host, "docs.example.org");
    }

    #[test]
    fn test_reload_from_invalid_file_keeps_rules() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "version = 1\ncanonical_domain = \"www.example.org\"\n").unwrap();
        assert!(reload_from(file.path()).is_none());

        assert!(reload_from(Path::new("/nonexistent/redirect.toml")).is_none());
    }
}
