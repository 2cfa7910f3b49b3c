//! Canonical HTTP response and status line

use serde::{Deserialize, Serialize};

use crate::adapter::ClientResponse;
use crate::normalizer::{normalize_headers, Headers, RawHeaders};
use crate::{Error, Result};

/// Status line: numeric code and reason phrase
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResponseStatus {
    code: u16,
    message: String,
}

impl ResponseStatus {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Build from a client library's response object
    ///
    /// # Errors
    /// Returns `InvalidStatusCode` if the code field is not an integer.
    pub fn from_client_response<R: ClientResponse + ?Sized>(response: &R) -> Result<Self> {
        let raw = response.status_code();
        let code = raw
            .trim()
            .parse::<u16>()
            .map_err(|_| Error::InvalidStatusCode(raw.to_string()))?;
        Ok(ResponseStatus::new(code, response.status_message()))
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Canonical HTTP response
///
/// The body is an owned `String`: whatever the adapter handed over, only the
/// text is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawResponse")]
pub struct Response {
    status: ResponseStatus,
    headers: Headers,
    body: Option<String>,
    http_version: Option<String>,
}

#[derive(Deserialize)]
struct RawResponse {
    status: ResponseStatus,
    #[serde(default)]
    headers: Option<RawHeaders>,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    http_version: Option<String>,
}

impl From<RawResponse> for Response {
    fn from(raw: RawResponse) -> Self {
        Response::new(raw.status, raw.headers, raw.body, raw.http_version)
    }
}

impl Response {
    pub fn new(
        status: ResponseStatus,
        headers: Option<RawHeaders>,
        body: Option<String>,
        http_version: Option<String>,
    ) -> Self {
        Self {
            status,
            headers: normalize_headers(headers),
            body,
            http_version,
        }
    }

    /// Build from a client library's response object
    ///
    /// # Errors
    /// Returns `InvalidStatusCode` if the status code cannot be read.
    pub fn from_client_response<R: ClientResponse + ?Sized>(response: &R) -> Result<Self> {
        Ok(Response::new(
            ResponseStatus::from_client_response(response)?,
            response.raw_headers(),
            response.body().map(str::to_string),
            response.http_version().map(str::to_string),
        ))
    }

    pub fn status(&self) -> &ResponseStatus {
        &self.status
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    pub fn http_version(&self) -> Option<&str> {
        self.http_version.as_deref()
    }
}
