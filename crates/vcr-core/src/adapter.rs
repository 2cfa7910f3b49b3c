//! Adapter seam between native HTTP objects and raw VCR input
//!
//! An HTTP-stubbing integration intercepts live traffic and hands the core
//! its library's own request/response objects. These traits describe the
//! little the core needs from them; `Request::from_client_request` and
//! `Response::from_client_response` build canonical values on top.
//!
//! Implementations for the `http` crate's `Request`/`Response` are provided.

use std::borrow::Cow;

use http::header::HeaderMap;
use http::Version;

use crate::normalizer::{RawHeaderValue, RawHeaders};

/// An outgoing request as seen by a client library
pub trait ClientRequest {
    /// Method name in any case
    fn method(&self) -> &str;

    fn body(&self) -> Option<&str>;

    /// Header collection, `None` if the library has none at all
    fn raw_headers(&self) -> Option<RawHeaders>;
}

/// A received response as seen by a client library
pub trait ClientResponse {
    /// The status line's code field, as text
    ///
    /// Libraries that keep the code as a number render it here.
    fn status_code(&self) -> Cow<'_, str>;

    fn status_message(&self) -> &str;

    fn raw_headers(&self) -> Option<RawHeaders>;

    fn body(&self) -> Option<&str>;

    /// Protocol version without the `HTTP/` prefix, e.g. `"1.1"`
    fn http_version(&self) -> Option<&str>;
}

/// Resolves the full URI of a request
///
/// Client libraries often keep only a path on the request and the host on
/// the connection handle, so the integration supplies this capability.
pub trait RequestUri<C: ?Sized, R: ?Sized> {
    fn request_uri(&self, client: &C, request: &R) -> String;
}

impl<C: ?Sized, R: ?Sized, F> RequestUri<C, R> for F
where
    F: Fn(&C, &R) -> String,
{
    fn request_uri(&self, client: &C, request: &R) -> String {
        self(client, request)
    }
}

/// Reads the URI straight off an `http::Request`
///
/// Suitable when the request already carries an absolute URI; the client
/// handle is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct UriFromRequest;

impl<C: ?Sized, B> RequestUri<C, http::Request<B>> for UriFromRequest {
    fn request_uri(&self, _client: &C, request: &http::Request<B>) -> String {
        request.uri().to_string()
    }
}

// ── http crate ─────────────────────────────────────────────

impl From<&HeaderMap> for RawHeaders {
    fn from(map: &HeaderMap) -> Self {
        map.keys()
            .map(|name| {
                let values = map
                    .get_all(name)
                    .iter()
                    .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
                    .collect::<Vec<_>>();
                (name.as_str(), RawHeaderValue::Many(values))
            })
            .collect()
    }
}

/// Body text of an `http` message
///
/// `String` bodies have no notion of absence; an empty one is treated as
/// no body.
pub trait HttpBody {
    fn as_body(&self) -> Option<&str>;
}

impl HttpBody for String {
    fn as_body(&self) -> Option<&str> {
        if self.is_empty() {
            None
        } else {
            Some(self.as_str())
        }
    }
}

impl HttpBody for Option<String> {
    fn as_body(&self) -> Option<&str> {
        self.as_deref()
    }
}

impl HttpBody for () {
    fn as_body(&self) -> Option<&str> {
        None
    }
}

impl<B: HttpBody> ClientRequest for http::Request<B> {
    fn method(&self) -> &str {
        http::Request::method(self).as_str()
    }

    fn body(&self) -> Option<&str> {
        http::Request::body(self).as_body()
    }

    fn raw_headers(&self) -> Option<RawHeaders> {
        Some(RawHeaders::from(self.headers()))
    }
}

impl<B: HttpBody> ClientResponse for http::Response<B> {
    fn status_code(&self) -> Cow<'_, str> {
        Cow::Owned(self.status().as_str().to_string())
    }

    fn status_message(&self) -> &str {
        self.status().canonical_reason().unwrap_or("")
    }

    fn raw_headers(&self) -> Option<RawHeaders> {
        Some(RawHeaders::from(self.headers()))
    }

    fn body(&self) -> Option<&str> {
        http::Response::body(self).as_body()
    }

    fn http_version(&self) -> Option<&str> {
        version_str(self.version())
    }
}

const VERSIONS: [(Version, &str); 5] = [
    (Version::HTTP_09, "0.9"),
    (Version::HTTP_10, "1.0"),
    (Version::HTTP_11, "1.1"),
    (Version::HTTP_2, "2"),
    (Version::HTTP_3, "3"),
];

fn version_str(version: Version) -> Option<&'static str> {
    VERSIONS
        .iter()
        .find(|(known, _)| *known == version)
        .map(|&(_, name)| name)
}
