//! Tag lookup.

use crate::StoreError;
use herdguard_types::Tag;

pub trait TagStore: Send + Sync {
    /// The livestock record carrying `code`. An unknown code is `Ok(None)`.
    fn lookup_by_tag(&self, code: &str) -> Result<Option<Tag>, StoreError>;
}
