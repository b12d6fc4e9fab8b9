//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Engine, emulator and watcher produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through emulator logs
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
