//! Recorded interaction: one request paired with its response

use serde::{Deserialize, Serialize};

use crate::normalizer::canonical_hash;
use crate::request::{Method, Request};
use crate::response::Response;
use crate::Result;

/// One recorded HTTP exchange
///
/// Both halves are canonical by construction; nothing is normalized here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpInteraction {
    request: Request,
    response: Response,
}

impl HttpInteraction {
    pub fn new(request: Request, response: Response) -> Self {
        Self { request, response }
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn response(&self) -> &Response {
        &self.response
    }

    pub fn uri(&self) -> &str {
        self.request.uri()
    }

    pub fn method(&self) -> &Method {
        self.request.method()
    }

    pub fn into_parts(self) -> (Request, Response) {
        (self.request, self.response)
    }

    /// SHA-256 of the canonical serialization
    pub fn canonical_hash(&self) -> Result<String> {
        canonical_hash(self)
    }
}
