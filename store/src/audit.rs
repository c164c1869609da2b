//! Verification audit trail.

use crate::StoreError;
use herdguard_types::VerificationRecord;

/// Append-only sink for verification records.
///
/// Callers treat the append as fire-and-forget: an error is logged, never
/// turned into a failed verification.
pub trait AuditSink: Send + Sync {
    fn append(&self, record: VerificationRecord) -> Result<(), StoreError>;
}

/// Read access to the trail, for the dashboard.
pub trait AuditLog: Send + Sync {
    /// Up to `limit` records, newest first.
    fn recent(&self, limit: usize) -> Result<Vec<VerificationRecord>, StoreError>;
}
