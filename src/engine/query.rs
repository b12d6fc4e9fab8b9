//! Query-string serialization.
//!
//! Produces the `key=value&key2=value2` form appended to redirect targets.
//! Key order is the delivery order of the input mapping, never sorted.

use std::borrow::Cow;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

use crate::engine::types::{QueryString, QueryValue};

/// Characters left untouched by `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// How keys and values are written into the serialized query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryEncoding {
    /// Copy keys and values verbatim.
    #[default]
    Raw,
    /// Percent-encode keys and values the way `encodeURIComponent` does.
    Component,
}

impl QueryEncoding {
    fn apply<'a>(self, input: &'a str) -> Cow<'a, str> {
        match self {
            QueryEncoding::Raw => Cow::Borrowed(input),
            QueryEncoding::Component => utf8_percent_encode(input, URI_COMPONENT).into(),
        }
    }
}

/// Serialize `query` into `key=value` pairs joined by `&`.
///
/// - a multi-value key emits one pair per element, in element order
/// - an empty single value emits the bare key
/// - an empty mapping yields an empty string
pub fn serialize(query: &QueryString, encoding: QueryEncoding) -> String {
    let mut fragments: Vec<String> = Vec::with_capacity(query.len());

    for (key, value) in query.iter() {
        let key = encoding.apply(key);
        match value {
            QueryValue::Multi { multi_value } => {
                if multi_value.is_empty() {
                    continue;
                }
                let pairs: Vec<String> = multi_value
                    .iter()
                    .map(|entry| format!("{}={}", key, encoding.apply(&entry.value)))
                    .collect();
                fragments.push(pairs.join("&"));
            }
            QueryValue::Single { value } if value.is_empty() => {
                fragments.push(key.into_owned());
            }
            QueryValue::Single { value } => {
                fragments.push(format!("{}={}", key, encoding.apply(value)));
            }
        }
    }

    fragments.join("&")
}

impl QueryString {
    /// Build a mapping from a raw `a=1&b=2&a=3` query without decoding.
    ///
    /// Repeated keys become multi-value entries; a key without `=` gets an
    /// empty value. A leading `?` is ignored.
    pub fn parse_raw(raw: &str) -> Self {
        let mut query = QueryString::new();
        for (key, value) in pairs(raw) {
            query.append(key, value);
        }
        query
    }

    /// Like [`QueryString::parse_raw`], but percent-decodes keys and values.
    ///
    /// Pair this with [`QueryEncoding::Component`] so that a query arriving
    /// already encoded is not encoded a second time. Invalid UTF-8 after
    /// decoding is replaced rather than rejected.
    pub fn parse_encoded(raw: &str) -> Self {
        let mut query = QueryString::new();
        for (key, value) in pairs(raw) {
            query.append(decode(key), decode(value));
        }
        query
    }

    /// Parse a query the way [`serialize`] will write it back under `encoding`.
    pub fn parse_for(raw: &str, encoding: QueryEncoding) -> Self {
        match encoding {
            QueryEncoding::Raw => Self::parse_raw(raw),
            QueryEncoding::Component => Self::parse_encoded(raw),
        }
    }
}

fn pairs(raw: &str) -> impl Iterator<Item = (&str, &str)> {
    raw.strip_prefix('?')
        .unwrap_or(raw)
        .split('&')
        .filter(|p| !p.is_empty())
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
}

fn decode(input: &str) -> String {
    percent_decode_str(input).decode_utf8_lossy().into_owned()
}
