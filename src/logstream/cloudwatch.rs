//! AWS CloudWatch Logs implementation of the remote log sink.

use async_trait::async_trait;
use aws_sdk_cloudwatchlogs::Client;
use aws_sdk_cloudwatchlogs::error::DisplayErrorContext;
use aws_sdk_cloudwatchlogs::types::InputLogEvent;

use super::LogSink;
use crate::error::ProbeError;

/// Remote log sink backed by AWS CloudWatch Logs.
///
/// The client is constructed once per process and injected; it is a
/// stateless handle, safe to share across concurrent invocations.
#[derive(Debug, Clone)]
pub struct CloudWatchSink {
    client: Client,
}

impl CloudWatchSink {
    /// Creates a sink over the given SDK client.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LogSink for CloudWatchSink {
    async fn ensure_group(&self, group: &str, retention_days: i32) -> Result<(), ProbeError> {
        match self
            .client
            .create_log_group()
            .log_group_name(group)
            .send()
            .await
        {
            Ok(_) => {
                // Retention is applied once, at group creation.
                self.client
                    .put_retention_policy()
                    .log_group_name(group)
                    .retention_in_days(retention_days)
                    .send()
                    .await
                    .map_err(|e| ProbeError::LogService(DisplayErrorContext(&e).to_string()))?;
                Ok(())
            }
            Err(e) => {
                let already_exists = e
                    .as_service_error()
                    .is_some_and(|se| se.is_resource_already_exists_exception());
                if already_exists {
                    Ok(())
                } else {
                    Err(ProbeError::LogService(DisplayErrorContext(&e).to_string()))
                }
            }
        }
    }

    async fn create_stream(&self, group: &str, stream: &str) -> Result<(), ProbeError> {
        self.client
            .create_log_stream()
            .log_group_name(group)
            .log_stream_name(stream)
            .send()
            .await
            .map_err(|e| ProbeError::LogService(DisplayErrorContext(&e).to_string()))?;
        Ok(())
    }

    async fn put_event(
        &self,
        group: &str,
        stream: &str,
        timestamp_ms: i64,
        message: &str,
    ) -> Result<(), ProbeError> {
        let event = InputLogEvent::builder()
            .timestamp(timestamp_ms)
            .message(message)
            .build()
            .map_err(|e| ProbeError::LogService(e.to_string()))?;

        self.client
            .put_log_events()
            .log_group_name(group)
            .log_stream_name(stream)
            .log_events(event)
            .send()
            .await
            .map_err(|e| ProbeError::LogService(DisplayErrorContext(&e).to_string()))?;
        Ok(())
    }
}
