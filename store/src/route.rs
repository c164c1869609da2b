//! Route storage trait.

use crate::StoreError;
use herdguard_types::{Route, RouteId};

pub trait RouteStore: Send + Sync {
    /// Routes in `active` status, in stable order.
    fn active_routes(&self) -> Result<Vec<Route>, StoreError>;

    /// A route by id regardless of status.
    fn route(&self, id: RouteId) -> Result<Option<Route>, StoreError>;

    fn active_route_count(&self) -> Result<u64, StoreError> {
        self.active_routes().map(|r| r.len() as u64)
    }
}
