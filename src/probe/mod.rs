//! Connectivity probe: the connect/test/cleanup sequence.
//!
//! [`ConnectivityProbe`] verifies read/write connectivity through a
//! bounded, self-cleaning transaction: connect with a hard acquisition
//! timeout, read the server version, create the probe table, insert a
//! marker row, re-read it, delete it, verify the deletion, commit.
//! The session is closed at a single call site regardless of which
//! step failed, and every transition into Success or Failed is
//! mirrored to both log sinks before returning.

pub mod driver;
pub mod postgres;

pub use driver::{DatabaseDriver, DatabaseSession};
pub use postgres::PgDriver;

use std::sync::Arc;
use std::time::Duration;

use crate::domain::{CredentialRecord, LogLevel, LogStreamHandle, ProbeResult, TestRecord};
use crate::error::ProbeError;
use crate::logstream::LogStreamManager;

/// Runs the end-to-end connectivity test against one database.
#[derive(Clone)]
pub struct ConnectivityProbe {
    driver: Arc<dyn DatabaseDriver>,
    connect_timeout: Duration,
}

impl std::fmt::Debug for ConnectivityProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectivityProbe")
            .field("connect_timeout", &self.connect_timeout)
            .finish_non_exhaustive()
    }
}

impl ConnectivityProbe {
    /// Creates a probe over the given driver with the given
    /// connection acquisition bound.
    #[must_use]
    pub fn new(driver: Arc<dyn DatabaseDriver>, connect_timeout: Duration) -> Self {
        Self {
            driver,
            connect_timeout,
        }
    }

    /// Runs the probe. Never returns an error: every failure is folded
    /// into [`ProbeResult::Failed`] with a descriptive message.
    pub async fn run(
        &self,
        credential: &CredentialRecord,
        logs: &LogStreamManager,
        handle: Option<&LogStreamHandle>,
    ) -> ProbeResult {
        info_both(
            logs,
            handle,
            &format!("Attempting to connect to database at {}", credential.host),
        )
        .await;

        let mut session = match self.driver.connect(credential, self.connect_timeout).await {
            Ok(session) => session,
            Err(e) => {
                let error = e.to_string();
                error_both(logs, handle, &error).await;
                return ProbeResult::Failed { error };
            }
        };

        let outcome = exercise(session.as_mut(), logs, handle).await;

        // The only close site: reached on success and on every failure
        // past a successful open.
        session.close().await;
        tracing::info!("database connection closed");

        match outcome {
            Ok((version, test_record, deleted_record_id)) => ProbeResult::Success {
                version,
                test_record,
                deleted_record_id,
            },
            Err(e) => {
                let error = e.to_string();
                error_both(logs, handle, &error).await;
                ProbeResult::Failed { error }
            }
        }
    }
}

/// Steps 2–8 of the probe, run against an open session. Connection
/// close is owned by the caller.
async fn exercise(
    session: &mut dyn DatabaseSession,
    logs: &LogStreamManager,
    handle: Option<&LogStreamHandle>,
) -> Result<(String, TestRecord, i32), ProbeError> {
    session.begin().await?;

    let version = session.server_version().await?;
    info_both(logs, handle, &format!("Database version: {version}")).await;

    session.ensure_probe_table().await?;

    let test_record = session.insert_marker().await?;
    info_both(
        logs,
        handle,
        &format!("Test record inserted with id {}", test_record.id),
    )
    .await;

    let visible = session.fetch_marker(test_record.id).await?;
    if visible.is_none() {
        return Err(ProbeError::Unexpected(format!(
            "inserted record {} is not visible",
            test_record.id
        )));
    }
    info_both(
        logs,
        handle,
        &format!("Test record {} verified readable", test_record.id),
    )
    .await;

    session.delete_marker(test_record.id).await?;
    info_both(
        logs,
        handle,
        &format!("Deleted test record with id {}", test_record.id),
    )
    .await;

    // Cleanup verification is a diagnostic, never a failure.
    match session.fetch_marker(test_record.id).await? {
        None => {
            info_both(logs, handle, "Record successfully deleted").await;
        }
        Some(_) => {
            warn_both(logs, handle, "Record still exists after deletion").await;
        }
    }

    session.commit().await?;

    let deleted_record_id = test_record.id;
    Ok((version, test_record, deleted_record_id))
}

async fn info_both(logs: &LogStreamManager, handle: Option<&LogStreamHandle>, message: &str) {
    tracing::info!("{message}");
    logs.emit(handle, LogLevel::Info, message).await;
}

async fn warn_both(logs: &LogStreamManager, handle: Option<&LogStreamHandle>, message: &str) {
    tracing::warn!("{message}");
    logs.emit(handle, LogLevel::Warn, message).await;
}

async fn error_both(logs: &LogStreamManager, handle: Option<&LogStreamHandle>, message: &str) {
    tracing::error!("{message}");
    logs.emit(handle, LogLevel::Error, message).await;
}
