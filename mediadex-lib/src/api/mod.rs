//! Aggregated media operations
//!
//! Each module wires one upstream source into the client: build the
//! parameter bag, go through the appropriate cache, parse the raw payload,
//! and normalize. The pipeline is stateless per call; coalescing and expiry
//! live entirely in the cache layer.

mod anime;
mod hianime;
mod videos;

pub use hianime::HiAnimeHome;

use crate::cache::Params;
use crate::error::ApiError;
use crate::error::Error;

/// Maps a payload-shape mismatch into a parse error naming the operation.
pub(crate) fn payload_err(what: &'static str) -> impl FnOnce(serde_json::Error) -> Error {
    move |err| ApiError::parse(format!("unexpected {} payload: {}", what, err)).into()
}

/// Appends the rendered query string to a base URL, omitting the `?` when
/// there are no parameters.
pub(crate) fn with_query(base: String, params: &Params) -> String {
    let query = params.to_query_string();
    if query.is_empty() {
        base
    } else {
        format!("{}?{}", base, query)
    }
}
