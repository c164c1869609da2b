//! Caller identity.
//!
//! Token issuance happens upstream; by the time a request reaches this
//! service the gateway has resolved the officer and forwards their reference
//! in the `x-actor-id` header. That value is what gets written into audit
//! records.

use crate::error::RpcError;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use herdguard_types::ActorId;

pub const ACTOR_HEADER: &str = "x-actor-id";

/// Extracts the authenticated actor. Rejects with 401 when the header is
/// missing, empty, or not valid UTF-8.
#[derive(Clone, Debug, PartialEq)]
pub struct Actor(pub ActorId);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Actor {
    type Rejection = RpcError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(ACTOR_HEADER)
            .ok_or_else(|| RpcError::Unauthorized(format!("missing {ACTOR_HEADER} header")))?;
        let raw = value
            .to_str()
            .map_err(|_| RpcError::Unauthorized(format!("{ACTOR_HEADER} is not valid text")))?
            .trim();
        if raw.is_empty() {
            return Err(RpcError::Unauthorized(format!("{ACTOR_HEADER} is empty")));
        }
        Ok(Actor(ActorId::new(raw)))
    }
}
