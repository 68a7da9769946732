//! Domain layer: core types shared across the probe pipeline.
//!
//! This module contains the invocation-scoped data model: the
//! credential tuple produced by secret resolution, the remote log
//! stream identity, and the structured probe outcome.

pub mod credential;
pub mod log_stream;
pub mod probe_result;
pub mod response;

pub use credential::CredentialRecord;
pub use log_stream::{LogLevel, LogStreamHandle};
pub use probe_result::{ProbeResult, TestRecord};
pub use response::{ResponseBody, ResponseEnvelope};
