//! Edge platform adapter.
//!
//! # Data Flow
//! ```text
//! viewer-request event (JSON)
//!     → event.rs (deserialize; host, uri, querystring)
//!     → handler.rs (RedirectEngine::decide)
//!     → EdgeResponse { statusCode, statusDescription, headers.location }
//!
//! harness.rs wraps the same path with timing for local test invocations.
//! ```

pub mod event;
pub mod handler;
pub mod harness;

pub use event::{EdgeRequest, EdgeResponse, HeaderEntry, ViewerRequestEvent};
pub use handler::handle_event;
pub use harness::{test_function, EventError, FunctionOutput, TestResult};
