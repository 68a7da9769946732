//! Probe invocation endpoint.

use axum::Json;
use axum::extract::State;
use axum::routing::post;
use axum::Router;

use crate::api::dto::ProbeInvocation;
use crate::app_state::AppState;
use crate::domain::{ResponseBody, ResponseEnvelope};

/// `POST /api/v1/probe` — Run one connectivity probe.
///
/// Infallible by design: the orchestrator converts every fault into a
/// well-formed envelope, so this handler never returns an error.
#[utoipa::path(
    post,
    path = "/api/v1/probe",
    tag = "Probe",
    summary = "Run a connectivity probe",
    description = "Resolves database credentials from the secret store, runs the \
                   write/read/delete test transaction, and reports the outcome. The \
                   request body is an opaque invocation event and may be empty.",
    request_body(
        content = ProbeInvocation,
        description = "Opaque invocation event",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Probe succeeded", body = ResponseBody),
        (status = 500, description = "Probe or execution failure", body = ResponseBody),
    )
)]
pub async fn run_probe(
    State(state): State<AppState>,
    _event: Option<Json<ProbeInvocation>>,
) -> ResponseEnvelope {
    // Event fields are currently unused by the probe.
    state.orchestrator.execute().await
}

/// Probe routes mounted under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new().route("/probe", post(run_probe))
}
