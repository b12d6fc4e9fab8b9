//! Edge redirect rule engine.
//!
//! Decides, for every inbound request at a content-delivery edge, where a
//! legacy host (`docs.`, `learn.`, `play.`) should send the client on the
//! canonical site, keeping the path and query intact.
//!
//! ```
//! use edge_redirect::engine::{QueryString, RedirectEngine};
//!
//! let engine = RedirectEngine::canonical("example.com");
//! let redirect = engine.decide("docs.example.com", "/", &QueryString::new()).unwrap();
//! assert_eq!(redirect.location, "https://www.example.com/docs/");
//! ```

pub mod config;
pub mod edge;
pub mod engine;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::RedirectConfig;
pub use engine::RedirectEngine;
pub use error::RedirectError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
