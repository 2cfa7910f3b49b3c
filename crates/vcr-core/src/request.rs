//! Canonical HTTP request and the matcher entry point

use std::collections::BTreeSet;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::adapter::{ClientRequest, RequestUri};
use crate::normalizer::{normalize_headers, normalize_uri, Headers, RawHeaders};
use crate::Error;

// ── Method ─────────────────────────────────────────────────

/// Request method, compared case-insensitively
///
/// Serialized as the lower-case name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
    Trace,
    Connect,
    /// Extension method, stored lower-cased
    Other(String),
}

impl Method {
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "get" => Method::Get,
            "post" => Method::Post,
            "put" => Method::Put,
            "patch" => Method::Patch,
            "delete" => Method::Delete,
            "head" => Method::Head,
            "options" => Method::Options,
            "trace" => Method::Trace,
            "connect" => Method::Connect,
            other => Method::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::Get => "get",
            Method::Post => "post",
            Method::Put => "put",
            Method::Patch => "patch",
            Method::Delete => "delete",
            Method::Head => "head",
            Method::Options => "options",
            Method::Trace => "trace",
            Method::Connect => "connect",
            Method::Other(name) => name,
        }
    }
}

impl FromStr for Method {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Method::parse(s))
    }
}

impl From<&str> for Method {
    fn from(name: &str) -> Self {
        Method::parse(name)
    }
}

impl From<String> for Method {
    fn from(name: String) -> Self {
        Method::parse(&name)
    }
}

impl From<Method> for String {
    fn from(method: Method) -> Self {
        method.as_str().to_string()
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Request ────────────────────────────────────────────────

/// Canonical HTTP request
///
/// Headers and URI are normalized by every constructor, including
/// deserialization, so a `Request` is canonical for its whole lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawRequest")]
pub struct Request {
    method: Method,
    uri: String,
    body: Option<String>,
    headers: Headers,
}

/// Wire shape accepted when loading a request
#[derive(Deserialize)]
struct RawRequest {
    method: Method,
    uri: String,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    headers: Option<RawHeaders>,
}

impl From<RawRequest> for Request {
    fn from(raw: RawRequest) -> Self {
        Request::new(raw.method, raw.uri, raw.body, raw.headers)
    }
}

impl Request {
    pub fn new(
        method: impl Into<Method>,
        uri: impl AsRef<str>,
        body: Option<String>,
        headers: Option<RawHeaders>,
    ) -> Self {
        Self {
            method: method.into(),
            uri: normalize_uri(uri.as_ref()),
            body,
            headers: normalize_headers(headers),
        }
    }

    /// Build from a client library's request object
    ///
    /// `adapter` supplies the full URI, which the request alone may not know.
    pub fn from_client_request<A, C, R>(adapter: &A, client: &C, request: &R) -> Self
    where
        A: RequestUri<C, R> + ?Sized,
        C: ?Sized,
        R: ClientRequest + ?Sized,
    {
        Request::new(
            request.method(),
            adapter.request_uri(client, request),
            request.body().map(str::to_string),
            request.raw_headers(),
        )
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Matcher over this request comparing only `match_attributes`
    pub fn matcher<I>(&self, match_attributes: I) -> RequestMatcher
    where
        I: IntoIterator<Item = MatchAttribute>,
    {
        RequestMatcher::new(self.clone(), match_attributes)
    }
}

// ── Matcher entry point ────────────────────────────────────

/// Request attribute a matcher can compare on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchAttribute {
    Method,
    Uri,
    Body,
    Headers,
}

impl MatchAttribute {
    pub const ALL: [MatchAttribute; 4] = [
        MatchAttribute::Method,
        MatchAttribute::Uri,
        MatchAttribute::Body,
        MatchAttribute::Headers,
    ];

    pub const DEFAULT: [MatchAttribute; 2] = [MatchAttribute::Method, MatchAttribute::Uri];

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchAttribute::Method => "method",
            MatchAttribute::Uri => "uri",
            MatchAttribute::Body => "body",
            MatchAttribute::Headers => "headers",
        }
    }
}

impl FromStr for MatchAttribute {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MatchAttribute::ALL
            .into_iter()
            .find(|attr| s.trim().eq_ignore_ascii_case(attr.as_str()))
            .ok_or_else(|| Error::UnknownMatchAttribute(s.to_string()))
    }
}

impl fmt::Display for MatchAttribute {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request paired with the attributes playback should compare on
///
/// Comparison itself belongs to the playback engine; this only carries the
/// inputs. Serializes as the selected attributes plus the request
/// restricted to them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestMatcher {
    request: Request,
    match_attributes: BTreeSet<MatchAttribute>,
}

impl RequestMatcher {
    pub fn new<I>(request: Request, match_attributes: I) -> Self
    where
        I: IntoIterator<Item = MatchAttribute>,
    {
        Self {
            request,
            match_attributes: match_attributes.into_iter().collect(),
        }
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn match_attributes(&self) -> &BTreeSet<MatchAttribute> {
        &self.match_attributes
    }

    pub fn matches_on(&self, attribute: MatchAttribute) -> bool {
        self.match_attributes.contains(&attribute)
    }
}

impl Serialize for RequestMatcher {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.match_attributes.len() + 1))?;
        map.serialize_entry("match_attributes", &self.match_attributes)?;
        for attr in &self.match_attributes {
            match attr {
                MatchAttribute::Method => map.serialize_entry("method", &self.request.method)?,
                MatchAttribute::Uri => map.serialize_entry("uri", &self.request.uri)?,
                MatchAttribute::Body => map.serialize_entry("body", &self.request.body)?,
                MatchAttribute::Headers => map.serialize_entry("headers", &self.request.headers)?,
            }
        }
        map.end()
    }
}
