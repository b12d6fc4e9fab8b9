//! Errors raised while deciding a redirect.
//!
//! Configuration errors live next to the loader in `config::loader`.

use thiserror::Error;

/// Failure to produce a redirect for a single request.
///
/// Neither variant is retryable: the calling platform decides what the
/// client sees (origin pass-through, an error page, a 503).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RedirectError {
    /// The host matched none of the configured routing rules.
    #[error("Unknown host: {0}")]
    UnknownHost(String),

    /// The request carried no host header at all.
    #[error("Request has no host header")]
    MissingHost,
}
