//! Local edge emulator subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, host without port)
//!     → RedirectEngine::decide
//!     → 301/302 + Location, or 503 when no rule applies
//! ```

pub mod request;
pub mod server;

pub use request::{MakeRequestUuidV4, X_REQUEST_ID};
pub use server::{apply_config, HttpServer};
