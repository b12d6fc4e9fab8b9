//! Value types passed into and out of the decision engine.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// A single `{ "value": ... }` entry of a query parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryEntry {
    pub value: String,
}

/// Value of one query key as delivered by the edge platform.
///
/// A repeated key arrives as `multiValue`; the platform may also set `value`
/// alongside it, in which case the multi-value form wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    Multi {
        #[serde(rename = "multiValue")]
        multi_value: Vec<QueryEntry>,
    },
    Single {
        value: String,
    },
}

impl QueryValue {
    pub fn single(value: impl Into<String>) -> Self {
        QueryValue::Single {
            value: value.into(),
        }
    }

    pub fn multi<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        QueryValue::Multi {
            multi_value: values
                .into_iter()
                .map(|v| QueryEntry { value: v.into() })
                .collect(),
        }
    }

    /// Append another occurrence of the same key, promoting to multi-value.
    fn push(&mut self, value: String) {
        match self {
            QueryValue::Multi { multi_value } => multi_value.push(QueryEntry { value }),
            QueryValue::Single { value: first } => {
                let first = std::mem::take(first);
                *self = QueryValue::Multi {
                    multi_value: vec![QueryEntry { value: first }, QueryEntry { value }],
                };
            }
        }
    }
}

/// Ordered query-string mapping.
///
/// Keys keep the order in which they were delivered. Serde
/// (de)serializes it as a JSON object without reordering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryString {
    entries: Vec<(String, QueryValue)>,
}

impl QueryString {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the value for `key`. A replaced key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: QueryValue) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Record one more occurrence of `key`, merging repeats into a multi-value.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => existing.push(value),
            None => self.entries.push((key, QueryValue::Single { value })),
        }
    }

    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, QueryValue)> for QueryString {
    fn from_iter<T: IntoIterator<Item = (K, QueryValue)>>(iter: T) -> Self {
        let mut query = QueryString::new();
        for (key, value) in iter {
            query.insert(key, value);
        }
        query
    }
}

impl Serialize for QueryString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct QueryStringVisitor;

impl<'de> Visitor<'de> for QueryStringVisitor {
    type Value = QueryString;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of query keys to {value} or {multiValue} objects")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut query = QueryString::new();
        while let Some((key, value)) = access.next_entry::<String, QueryValue>()? {
            query.insert(key, value);
        }
        Ok(query)
    }

    fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
        Ok(QueryString::new())
    }

    fn visit_none<E: serde::de::Error>(self) -> Result<Self::Value, E> {
        Ok(QueryString::new())
    }
}

impl<'de> Deserialize<'de> for QueryString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(QueryStringVisitor)
    }
}

/// Redirect status codes a rule may emit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum RedirectStatus {
    #[default]
    MovedPermanently,
    Found,
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("Unsupported redirect status {0} (expected 301 or 302)")]
pub struct UnsupportedStatus(pub u16);

impl RedirectStatus {
    pub fn code(self) -> u16 {
        match self {
            RedirectStatus::MovedPermanently => 301,
            RedirectStatus::Found => 302,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            RedirectStatus::MovedPermanently => "Moved Permanently",
            RedirectStatus::Found => "Found",
        }
    }
}

impl TryFrom<u16> for RedirectStatus {
    type Error = UnsupportedStatus;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        match code {
            301 => Ok(RedirectStatus::MovedPermanently),
            302 => Ok(RedirectStatus::Found),
            other => Err(UnsupportedStatus(other)),
        }
    }
}

impl From<RedirectStatus> for u16 {
    fn from(status: RedirectStatus) -> Self {
        status.code()
    }
}

impl fmt::Display for RedirectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code(), self.description())
    }
}

/// The engine's answer for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub status: RedirectStatus,
    pub location: String,
}

impl Redirect {
    pub fn status_code(&self) -> u16 {
        self.status.code()
    }

    pub fn status_description(&self) -> &'static str {
        self.status.description()
    }
}
