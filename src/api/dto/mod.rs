//! Data Transfer Objects for the invocation surface.
//!
//! The response side of the contract is the
//! [`ResponseEnvelope`](crate::domain::ResponseEnvelope) itself; only
//! the request side needs a DTO here.

use serde::Deserialize;
use utoipa::ToSchema;

/// Opaque invocation event accepted by `POST /api/v1/probe`.
///
/// The probe does not currently use any event field; the payload is
/// accepted (and ignored) so schedulers can pass their native event
/// shapes through unchanged.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ProbeInvocation {
    /// Arbitrary invoker-supplied payload.
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub event: serde_json::Map<String, serde_json::Value>,
}
