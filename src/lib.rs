//! # aurora-pulse
//!
//! Connectivity health-check probe for managed PostgreSQL. On each
//! invocation the service resolves credentials from AWS Secrets
//! Manager, opens a bounded-timeout connection, runs a
//! write/read/delete test transaction, and reports the outcome to the
//! local process log, a per-invocation CloudWatch log stream, and the
//! caller — never raising an unhandled fault.
//!
//! ## Architecture
//!
//! ```text
//! Invoker (HTTP POST /api/v1/probe)
//!     │
//!     ├── ProbeOrchestrator (service/)
//!     │       │
//!     │       ├── LogStreamManager (logstream/) — best effort
//!     │       ├── SecretResolver (secret/)
//!     │       └── ConnectivityProbe (probe/)
//!     │
//!     ├── AWS Secrets Manager / CloudWatch Logs
//!     └── PostgreSQL (single non-pooled connection)
//! ```
//!
//! Retries, scheduling, and connection pooling are the invoker's
//! responsibility; each invocation is one independent sequential flow.

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod logstream;
pub mod probe;
pub mod secret;
pub mod service;
