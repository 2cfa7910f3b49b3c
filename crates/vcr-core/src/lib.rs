//! VCR Core - Canonical HTTP request/response model for record and playback
//!
//! Recorded interactions are compared and replayed by other components. This
//! crate guarantees the values they compare are in one stable shape: two
//! semantically equivalent HTTP messages always normalize to the same
//! canonical representation.
//!
//! # Architecture
//!
//! ```text
//! Adapter (native request/response) → Request / Response
//!                                        ↓ (at construction)
//!                          Header Normalizer + URI Normalizer
//!                                        ↓
//!                    HttpInteraction → storage / RequestMatcher
//! ```
//!
//! # Guarantees
//!
//! - **Deterministic**: Same input always produces identical output
//! - **Idempotent**: Normalizing a canonical value changes nothing
//! - **Total**: Normalization never fails
//! - **Immutable**: Fields are read-only once constructed

pub mod adapter;
pub mod error;
pub mod interaction;
pub mod normalizer;
pub mod request;
pub mod response;

pub use adapter::{ClientRequest, ClientResponse, RequestUri, UriFromRequest};
pub use error::{Error, Result};
pub use interaction::HttpInteraction;
pub use normalizer::{canonical_hash, Headers, RawHeaderValue, RawHeaders};
pub use request::{MatchAttribute, Method, Request, RequestMatcher};
pub use response::{Response, ResponseStatus};
