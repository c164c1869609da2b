use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store cannot be reached. The only store failure that
    /// callers should surface as a hard error.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("key not found: {0}")]
    NotFound(String),

    #[error("duplicate key: {0}")]
    Duplicate(String),

    #[error("invalid record: {0}")]
    Invalid(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl StoreError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}
