use thiserror::Error;

/// Error type returned by host-implemented store capabilities
pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum GmtError {
    /// The scope argument was neither a `Scope` nor a key/value mapping.
    /// This is a caller bug and is the only error the predicate propagates.
    #[error("scope must be a Scope or a mapping with `list` and `dim`, got {0}")]
    InvalidScope(String),

    #[error("tombstone store failed: {0}")]
    Store(String),

    #[error("malformed tombstone record: {0}")]
    MalformedRecord(String),
}

impl GmtError {
    pub fn store(err: StoreError) -> Self {
        GmtError::Store(err.to_string())
    }
}
