//! Structured outcome of one connectivity probe.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The marker row inserted (and deleted) by the probe transaction.
///
/// The probe table carries a serial primary key, so `id` is always
/// present on an inserted row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TestRecord {
    /// Generated primary key of the inserted row.
    pub id: i32,
    /// Server-side insertion timestamp.
    pub recorded_at: DateTime<Utc>,
    /// Fixed marker text identifying probe rows.
    pub note: String,
}

/// Outcome of [`ConnectivityProbe::run`](crate::probe::ConnectivityProbe::run).
///
/// Produced exactly once per invocation and consumed exactly once by
/// the orchestrator when building the response envelope.
#[derive(Debug, Clone)]
pub enum ProbeResult {
    /// The full connect/write/read/delete/commit sequence completed.
    Success {
        /// Server version string from `SELECT version()`.
        version: String,
        /// The row inserted and verified during the probe.
        test_record: TestRecord,
        /// Id of the row that was deleted (equals `test_record.id`).
        deleted_record_id: i32,
    },
    /// The probe failed; `error` carries the originating cause.
    Failed {
        /// Human-readable description of the failure.
        error: String,
    },
}

impl ProbeResult {
    /// Returns `true` for the `Success` variant.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}
