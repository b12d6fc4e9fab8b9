//! Viewer-request handler.

use crate::edge::event::{EdgeResponse, ViewerRequestEvent};
use crate::engine::RedirectEngine;
use crate::error::RedirectError;

/// Run the engine for one viewer-request event.
///
/// Reads only the host header, the URI and the query string. The URI is
/// passed through as the path, so a literal `?...` inside it is carried
/// into the location unchanged.
pub fn handle_event(
    engine: &RedirectEngine,
    event: &ViewerRequestEvent,
) -> Result<EdgeResponse, RedirectError> {
    let request = &event.request;
    let host = request.host().ok_or(RedirectError::MissingHost)?;

    match engine.decide(host, &request.uri, &request.querystring) {
        Ok(redirect) => Ok(redirect.into()),
        Err(e) => {
            tracing::warn!(
                host = %host,
                uri = %request.uri,
                error = %e,
                "No redirect rule for event"
            );
            Err(e)
        }
    }
}
