//! Terminal response envelope returned to the invoker.
//!
//! The body is a fixed, serde-validated schema: the status code is
//! coarse (200 or 500) and every other field is optional, present
//! only when the corresponding stage produced it.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use super::TestRecord;

/// Message used on a fully successful probe.
pub const SUCCESS_MESSAGE: &str = "Successfully connected to and tested the database";
/// Message used when the probe itself reported failure.
pub const PROBE_FAILURE_MESSAGE: &str = "Failed to connect to database";
/// Message used when a fault escaped the probe and was caught at the
/// orchestration layer.
pub const EXECUTION_ERROR_MESSAGE: &str = "Probe execution error";

/// Typed response body at the system boundary.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ResponseBody {
    /// Human-readable outcome summary.
    pub message: String,
    /// Server version string, present on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// The inserted-and-verified marker row, present on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_record: Option<TestRecord>,
    /// Id of the deleted marker row, present on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_record_id: Option<i32>,
    /// Failure description, present on any 500.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Name of the remote log stream, when one was created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_stream: Option<String>,
}

/// The envelope handed back to the invoker. Always well-formed; the
/// orchestrator guarantees one is produced on every path.
#[derive(Debug, Clone)]
pub struct ResponseEnvelope {
    /// Coarse outcome: 200 on success, 500 on any failure.
    pub status_code: StatusCode,
    /// Typed response body.
    pub body: ResponseBody,
}

impl ResponseEnvelope {
    /// Builds the 200 envelope for a fully successful probe.
    #[must_use]
    pub fn success(
        version: String,
        test_record: TestRecord,
        deleted_record_id: i32,
        log_stream: Option<String>,
    ) -> Self {
        Self {
            status_code: StatusCode::OK,
            body: ResponseBody {
                message: SUCCESS_MESSAGE.to_string(),
                version: Some(version),
                test_record: Some(test_record),
                deleted_record_id: Some(deleted_record_id),
                error: None,
                log_stream,
            },
        }
    }

    /// Builds the 500 envelope for a probe-layer failure.
    #[must_use]
    pub fn probe_failure(error: String, log_stream: Option<String>) -> Self {
        Self {
            status_code: StatusCode::INTERNAL_SERVER_ERROR,
            body: ResponseBody {
                message: PROBE_FAILURE_MESSAGE.to_string(),
                version: None,
                test_record: None,
                deleted_record_id: None,
                error: Some(error),
                log_stream,
            },
        }
    }

    /// Builds the 500 envelope for a fault caught at the orchestration
    /// layer (configuration, secret resolution, anything unexpected).
    #[must_use]
    pub fn execution_error(error: String, log_stream: Option<String>) -> Self {
        Self {
            status_code: StatusCode::INTERNAL_SERVER_ERROR,
            body: ResponseBody {
                message: EXECUTION_ERROR_MESSAGE.to_string(),
                version: None,
                test_record: None,
                deleted_record_id: None,
                error: Some(error),
                log_stream,
            },
        }
    }
}

impl IntoResponse for ResponseEnvelope {
    fn into_response(self) -> Response {
        let mut response = Json(self.body).into_response();
        *response.status_mut() = self.status_code;
        response
    }
}
