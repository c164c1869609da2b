use herdguard_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VerificationError {
    /// Enrollment or tag data could not be read. Lookups that simply find
    /// nothing are not errors.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("invalid match policy: {0}")]
    InvalidPolicy(String),
}
