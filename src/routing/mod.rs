//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request (host, path)
//!     → router.rs (host lookup)
//!     → matcher.rs (evaluate prefix exceptions)
//!     → Return: matched RoutingRule or UnknownHost
//!
//! Rule Compilation (at engine construction):
//!     RuleConfig[]
//!     → Compile exception matchers
//!     → Index by lowercased host
//!     → Freeze as immutable RoutingTable
//! ```
//!
//! # Design Decisions
//! - Rules compiled once, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always matches same rule

pub mod matcher;
pub mod router;

pub use matcher::{AnyMatcher, Matcher, PathPrefixMatcher, PrefixMatch};
pub use router::{RoutingRule, RoutingTable};
