//! Error types

mod api;
mod config;
mod store;

pub use api::*;
pub use config::*;
pub use store::*;

use std::sync::Arc;

/// Top-level error for all client operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An upstream API call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The client is misconfigured for the requested operation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A fetch failure observed through a coalesced request.
    ///
    /// When several callers share one in-flight fetch, they all observe the
    /// same failure; the error is reference-counted between them.
    #[error(transparent)]
    Shared(Arc<Error>),
}

impl Error {
    /// Converts an error shared between coalesced callers back into an owned
    /// error where possible.
    ///
    /// When this caller is the sole remaining owner the inner error is
    /// returned directly; otherwise the shared handle is kept.
    pub fn from_shared(err: Arc<Error>) -> Self {
        Arc::try_unwrap(err).unwrap_or_else(Error::Shared)
    }

    /// Returns the HTTP status code if this error wraps an upstream HTTP
    /// failure.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api(api) => api.status_code(),
            Self::Config(_) => None,
            Self::Shared(inner) => inner.status_code(),
        }
    }
}
