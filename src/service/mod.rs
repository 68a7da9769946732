//! Service layer: invocation orchestration.
//!
//! [`ProbeOrchestrator`] sequences stream creation, secret resolution,
//! and the connectivity probe, and guarantees a well-formed
//! [`ResponseEnvelope`](crate::domain::ResponseEnvelope) on every path.

pub mod orchestrator;

pub use orchestrator::ProbeOrchestrator;
