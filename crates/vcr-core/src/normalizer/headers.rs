//! Header normalizer — raw header collections to canonical `Headers`
//!
//! Adapters hand over headers in whatever shape the HTTP library exposes:
//! a name may map to one string, to nothing, or to a list of strings.
//! The canonical form maps every lower-cased name to a list of values.
//!
//! # Guarantees
//!
//! - Every key is lower-case
//! - Every value is a `Vec<String>` (never a scalar, never absent)
//! - Value order within a header is preserved
//! - Absent input yields an empty mapping
//! - Case-variant duplicate names: the later one wins

use std::collections::btree_map::{self, Entry};
use std::collections::BTreeMap;
use std::fmt;

use log::debug;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ── Raw input ──────────────────────────────────────────────

/// A single raw header value as supplied by an adapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawHeaderValue {
    /// Header present with no value (`null`)
    Absent,
    /// Header with one scalar value
    Single(String),
    /// Header with an ordered list of values
    Many(Vec<String>),
}

impl From<&str> for RawHeaderValue {
    fn from(value: &str) -> Self {
        RawHeaderValue::Single(value.to_string())
    }
}

impl From<String> for RawHeaderValue {
    fn from(value: String) -> Self {
        RawHeaderValue::Single(value)
    }
}

impl From<Vec<String>> for RawHeaderValue {
    fn from(values: Vec<String>) -> Self {
        RawHeaderValue::Many(values)
    }
}

impl From<Vec<&str>> for RawHeaderValue {
    fn from(values: Vec<&str>) -> Self {
        RawHeaderValue::Many(values.into_iter().map(String::from).collect())
    }
}

impl<T: Into<RawHeaderValue>> From<Option<T>> for RawHeaderValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(RawHeaderValue::Absent, Into::into)
    }
}

/// Raw header collection in adapter iteration order
///
/// Order matters only for names that collide once lower-cased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawHeaders(Vec<(String, RawHeaderValue)>);

impl RawHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<RawHeaderValue>) {
        self.0.push((name.into(), value.into()));
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, (String, RawHeaderValue)> {
        self.0.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for RawHeaders
where
    K: Into<String>,
    V: Into<RawHeaderValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        RawHeaders(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl IntoIterator for RawHeaders {
    type Item = (String, RawHeaderValue);
    type IntoIter = std::vec::IntoIter<(String, RawHeaderValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl From<Headers> for RawHeaders {
    fn from(headers: Headers) -> Self {
        headers
            .0
            .into_iter()
            .map(|(name, values)| (name, RawHeaderValue::Many(values)))
            .collect()
    }
}

impl Serialize for RawHeaders {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

struct RawHeadersVisitor;

impl<'de> Visitor<'de> for RawHeadersVisitor {
    type Value = RawHeaders;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of header names to null, a string, or a list of strings")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((name, value)) = access.next_entry::<String, RawHeaderValue>()? {
            entries.push((name, value));
        }
        Ok(RawHeaders(entries))
    }
}

impl<'de> Deserialize<'de> for RawHeaders {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Document order is kept so collisions resolve the same way as
        // they would for an adapter.
        deserializer.deserialize_map(RawHeadersVisitor)
    }
}

// ── Canonical form ─────────────────────────────────────────

/// Canonical headers: lower-cased name → ordered values
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Headers(BTreeMap<String, Vec<String>>);

impl Headers {
    /// Look up a header by name (any case)
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.0.get(&name.to_lowercase()).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(&name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Vec<String>> {
        self.0.iter()
    }

    pub fn as_map(&self) -> &BTreeMap<String, Vec<String>> {
        &self.0
    }

    pub fn into_map(self) -> BTreeMap<String, Vec<String>> {
        self.0
    }
}

impl<'a> IntoIterator for &'a Headers {
    type Item = (&'a String, &'a Vec<String>);
    type IntoIter = btree_map::Iter<'a, String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<RawHeaders> for Headers {
    fn from(raw: RawHeaders) -> Self {
        normalize_headers(Some(raw))
    }
}

impl<'de> Deserialize<'de> for Headers {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<RawHeaders>::deserialize(deserializer).map(normalize_headers)
    }
}

// ── Normalization ──────────────────────────────────────────

/// Normalize a raw header collection to canonical form
///
/// `None` (no collection at all) yields an empty mapping. Never fails.
pub fn normalize_headers(raw: Option<RawHeaders>) -> Headers {
    let mut canonical = BTreeMap::new();

    for (name, value) in raw.into_iter().flatten() {
        let values = match value {
            RawHeaderValue::Many(values) => values,
            RawHeaderValue::Absent => Vec::new(),
            RawHeaderValue::Single(value) => vec![value],
        };

        match canonical.entry(name.to_lowercase()) {
            Entry::Occupied(mut slot) => {
                debug!(
                    "header {:?} collides with {:?} after lower-casing; keeping the later value",
                    name,
                    slot.key()
                );
                slot.insert(values);
            }
            Entry::Vacant(slot) => {
                slot.insert(values);
            }
        }
    }

    Headers(canonical)
}
