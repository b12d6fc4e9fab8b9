//! Request identification and host extraction.
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - An incoming `x-request-id` is kept, otherwise a UUID v4 is minted
//! - The port is stripped from the host before rule lookup

use axum::http::{header, HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Mints UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV4;

impl MakeRequestId for MakeRequestUuidV4 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Request ID of a request that passed through the request-id layer.
pub fn request_id<B>(request: &Request<B>) -> &str {
    request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Host the client asked for, without port. Falls back to the URI
/// authority for HTTP/2 requests that carry no `Host` header.
pub fn request_host<B>(request: &Request<B>) -> Option<&str> {
    let raw = request
        .headers()
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .or_else(|| request.uri().authority().map(|a| a.as_str()))?;
    let host = strip_port(raw);
    (!host.is_empty()).then_some(host)
}

fn strip_port(host: &str) -> &str {
    // Bracketed IPv6 literals contain colons of their own
    if host.starts_with('[') {
        return match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        };
    }
    match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_request_host_strips_port() {
        let req = Request::builder()
            .header("Host", "docs.example.com:8080")
            .body(Body::empty())
            .unwrap();
        assert_eq!(request_host(&req), Some("docs.example.com"));
    }

    #[test]
    fn test_request_host_from_authority() {
        let req = Request::builder()
            .uri("http://play.example.com/a")
            .body(Body::empty())
            .unwrap();
        assert_eq!(request_host(&req), Some("play.example.com"));
    }

    #[test]
    fn test_request_host_missing() {
        let req = Request::builder().uri("/a").body(Body::empty()).unwrap();
        assert_eq!(request_host(&req), None);
    }

    #[test]
    fn test_strip_port() {
        assert_eq!(strip_port("example.com"), "example.com");
        assert_eq!(strip_port("[::1]:8080"), "[::1]");
        assert_eq!(strip_port("example.com:abc"), "example.com:abc");
    }

    #[test]
    fn test_make_request_id() {
        let req = Request::builder().body(Body::empty()).unwrap();
        let id = MakeRequestUuidV4.make_request_id(&req).unwrap();
        let value = id.header_value().to_str().unwrap();
        assert!(Uuid::parse_str(value).is_ok());
    }
}
