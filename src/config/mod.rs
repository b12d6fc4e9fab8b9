//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RedirectConfig (validated, immutable)
//!     → compiled into a RoutingTable at engine construction
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → emulator swaps in a new engine
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All sections have defaults to allow minimal configs
//! - Rules are data (`[[rules]]`), never per-host conditionals

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    EdgeConfig, ListenerConfig, LogFormat, MatchingConfig, ObservabilityConfig, QueryConfig,
    RedirectConfig, RuleConfig, CONFIG_VERSION,
};
pub use validation::{validate_config, ValidationError};
