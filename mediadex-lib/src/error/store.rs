//! Key-value store error types

/// Errors from a key-value store backend.
///
/// Store failures never reach cache consumers: the durable cache logs them
/// and degrades to a miss or a skipped write. The type exists for store
/// implementations and for callers driving a store directly.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The underlying storage backend failed.
    #[error("Storage backend error: {0}")]
    Backend(String),
}

impl From<async_sqlite::Error> for StoreError {
    fn from(err: async_sqlite::Error) -> Self {
        Self::Backend(err.to_string())
    }
}
