//! Viewer-request event and response shapes.
//!
//! Mirrors the JSON the edge platform hands to a viewer-request function
//! and the response object it expects back. Only the fields the engine
//! reads are modelled; everything else in the payload is ignored.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

use crate::engine::{QueryString, Redirect};

/// Top-level viewer-request event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerRequestEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<EventContext>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewer: Option<Viewer>,

    pub request: EdgeRequest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventContext {
    #[serde(rename = "eventType")]
    pub event_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Viewer {
    pub ip: String,
}

/// The request portion of the event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    /// Path as delivered, used verbatim.
    pub uri: String,

    /// Absent or malformed query strings are treated as empty.
    #[serde(default, deserialize_with = "lenient_querystring")]
    pub querystring: QueryString,

    #[serde(default)]
    pub headers: EdgeRequestHeaders,
}

impl EdgeRequest {
    pub fn host(&self) -> Option<&str> {
        self.headers.host.as_ref().map(|h| h.value.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EdgeRequestHeaders {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<HeaderEntry>,
}

/// `{ "value": ... }` header wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderEntry {
    pub value: String,
}

/// Response object returned to the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeResponse {
    pub status_code: u16,
    pub status_description: String,
    pub headers: EdgeResponseHeaders,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeResponseHeaders {
    pub location: HeaderEntry,
}

impl EdgeResponse {
    pub fn location(&self) -> &str {
        &self.headers.location.value
    }
}

impl From<Redirect> for EdgeResponse {
    fn from(redirect: Redirect) -> Self {
        Self {
            status_code: redirect.status_code(),
            status_description: redirect.status_description().to_string(),
            headers: EdgeResponseHeaders {
                location: HeaderEntry {
                    value: redirect.location,
                },
            },
        }
    }
}

/// Either a well-formed query mapping or anything else.
///
/// Untagged buffering keeps the key order of the payload.
#[derive(Deserialize)]
#[serde(untagged)]
enum LenientQuery {
    Parsed(QueryString),
    Malformed(IgnoredAny),
}

fn lenient_querystring<'de, D>(deserializer: D) -> Result<QueryString, D::Error>
where
    D: Deserializer<'de>,
{
    match LenientQuery::deserialize(deserializer)? {
        LenientQuery::Parsed(query) => Ok(query),
        LenientQuery::Malformed(_) => {
            tracing::debug!("Ignoring malformed querystring");
            Ok(QueryString::new())
        }
    }
}
