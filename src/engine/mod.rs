//! Redirect decision engine.
//!
//! # Data Flow
//! ```text
//! (host, path, query)
//!     → decide.rs (rule lookup, segment insertion, target composition)
//!     → query.rs (serialize query in delivery order)
//!     → Redirect { status, location }
//! ```
//!
//! # Design Decisions
//! - Pure: no I/O, no shared mutable state, same input → same output
//! - Rule table and query encoding are injected at construction
//! - Unknown hosts fail loudly instead of producing a guessed redirect

pub mod decide;
pub mod query;
pub mod types;

pub use decide::RedirectEngine;
pub use query::{serialize, QueryEncoding};
pub use types::{QueryEntry, QueryString, QueryValue, Redirect, RedirectStatus, UnsupportedStatus};
