//! Best-effort remote log streaming, one stream per invocation.
//!
//! [`LogStreamManager`] owns the soft-fail layer: every remote call is
//! caught, logged to the local process log, and absorbed. Neither
//! stream creation nor emission can alter the probe outcome.

pub mod cloudwatch;

pub use cloudwatch::CloudWatchSink;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::{LogLevel, LogStreamHandle};
use crate::error::ProbeError;

/// Abstraction over the remote log service backend.
///
/// The concrete implementation is [`CloudWatchSink`]; tests use
/// in-memory sinks.
#[async_trait]
pub trait LogSink: Send + Sync {
    /// Ensures the log group exists. Already-exists is success; the
    /// retention policy is applied only when the group is newly
    /// created.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::LogService`] on any other service failure.
    async fn ensure_group(&self, group: &str, retention_days: i32) -> Result<(), ProbeError>;

    /// Creates a stream within the group.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::LogService`] on service failure.
    async fn create_stream(&self, group: &str, stream: &str) -> Result<(), ProbeError>;

    /// Sends one log event to the stream.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::LogService`] on service failure.
    async fn put_event(
        &self,
        group: &str,
        stream: &str,
        timestamp_ms: i64,
        message: &str,
    ) -> Result<(), ProbeError>;
}

/// Lifecycle and emission for one remote log stream per invocation.
#[derive(Clone)]
pub struct LogStreamManager {
    sink: Arc<dyn LogSink>,
    group: String,
    stream_prefix: String,
    retention_days: i32,
}

impl std::fmt::Debug for LogStreamManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogStreamManager")
            .field("group", &self.group)
            .field("stream_prefix", &self.stream_prefix)
            .field("retention_days", &self.retention_days)
            .finish_non_exhaustive()
    }
}

impl LogStreamManager {
    /// Creates a manager emitting into `group` through `sink`.
    #[must_use]
    pub fn new(
        sink: Arc<dyn LogSink>,
        group: String,
        stream_prefix: String,
        retention_days: i32,
    ) -> Self {
        Self {
            sink,
            group,
            stream_prefix,
            retention_days,
        }
    }

    /// Creates the per-invocation stream, returning `None` on any
    /// failure. Never propagates an error to the caller.
    ///
    /// The stream name is `{prefix}{YYYYmmddHHMMSS}-{uuid}`: the
    /// second-resolution timestamp keeps names browsable, the random
    /// suffix keeps them unique under invocations landing in the same
    /// second.
    pub async fn create_stream(&self) -> Option<LogStreamHandle> {
        let stream = format!(
            "{}{}-{}",
            self.stream_prefix,
            Utc::now().format("%Y%m%d%H%M%S"),
            Uuid::new_v4().simple()
        );

        match self.try_create(&stream).await {
            Ok(()) => {
                tracing::info!(group = %self.group, stream = %stream, "remote log stream created");
                Some(LogStreamHandle {
                    group: self.group.clone(),
                    stream,
                })
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to create remote log stream");
                None
            }
        }
    }

    async fn try_create(&self, stream: &str) -> Result<(), ProbeError> {
        self.sink.ensure_group(&self.group, self.retention_days).await?;
        self.sink.create_stream(&self.group, stream).await
    }

    /// Sends one `[LEVEL] message` event to the stream. No-op when the
    /// handle is absent; failures are logged locally and absorbed.
    pub async fn emit(&self, handle: Option<&LogStreamHandle>, level: LogLevel, message: &str) {
        let Some(handle) = handle else {
            return;
        };

        let timestamp_ms = Utc::now().timestamp_millis();
        let formatted = format!("[{level}] {message}");
        if let Err(e) = self
            .sink
            .put_event(&handle.group, &handle.stream, timestamp_ms, &formatted)
            .await
        {
            tracing::error!(
                error = %e,
                stream = %handle.stream,
                "failed to write remote log event"
            );
        }
    }
}
