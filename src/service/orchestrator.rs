//! Single entry point for one probe invocation.
//!
//! The orchestrator is the last line of the layered failure policy:
//! stream creation is best-effort, the probe folds its own failures
//! into [`ProbeResult`], and anything else — missing configuration,
//! secret faults — is caught here and mapped to a 500 envelope.
//! Nothing escapes uncaught.

use crate::domain::{LogLevel, LogStreamHandle, ProbeResult, ResponseEnvelope};
use crate::error::ProbeError;
use crate::logstream::LogStreamManager;
use crate::probe::ConnectivityProbe;
use crate::secret::SecretResolver;

/// Sequences one invocation end to end and always produces a response.
#[derive(Debug, Clone)]
pub struct ProbeOrchestrator {
    secret_id: Option<String>,
    resolver: SecretResolver,
    logs: LogStreamManager,
    probe: ConnectivityProbe,
}

impl ProbeOrchestrator {
    /// Creates an orchestrator over injected collaborators.
    ///
    /// `secret_id` comes from configuration; `None` is tolerated here
    /// and reported as a 500 at execution time.
    #[must_use]
    pub fn new(
        secret_id: Option<String>,
        resolver: SecretResolver,
        logs: LogStreamManager,
        probe: ConnectivityProbe,
    ) -> Self {
        Self {
            secret_id,
            resolver,
            logs,
            probe,
        }
    }

    /// Runs one invocation. Infallible: every fault is converted to a
    /// well-formed envelope.
    pub async fn execute(&self) -> ResponseEnvelope {
        let handle = self.logs.create_stream().await;

        match self.try_execute(handle.as_ref()).await {
            Ok(envelope) => envelope,
            Err(e) => {
                let error = format!("Probe execution failed: {e}");
                tracing::error!(kind = e.kind(), "{error}");
                self.logs
                    .emit(handle.as_ref(), LogLevel::Error, &error)
                    .await;
                ResponseEnvelope::execution_error(error, stream_name(handle.as_ref()))
            }
        }
    }

    /// The fallible part of the sequence. Probe failures are already
    /// folded into the envelope here; only configuration and secret
    /// faults surface as errors for [`execute`](Self::execute) to
    /// catch.
    async fn try_execute(
        &self,
        handle: Option<&LogStreamHandle>,
    ) -> Result<ResponseEnvelope, ProbeError> {
        let secret_id = self
            .secret_id
            .as_deref()
            .ok_or(ProbeError::MissingConfig("DB_SECRET_ID"))?;

        let credential = self.resolver.resolve(secret_id).await?;

        let result = self.probe.run(&credential, &self.logs, handle).await;
        let stream = stream_name(handle);

        match result {
            ProbeResult::Success {
                version,
                test_record,
                deleted_record_id,
            } => {
                let message = crate::domain::response::SUCCESS_MESSAGE;
                tracing::info!("{message}");
                self.logs.emit(handle, LogLevel::Info, message).await;
                Ok(ResponseEnvelope::success(
                    version,
                    test_record,
                    deleted_record_id,
                    stream,
                ))
            }
            ProbeResult::Failed { error } => {
                tracing::error!("failed to connect to database");
                Ok(ResponseEnvelope::probe_failure(error, stream))
            }
        }
    }
}

fn stream_name(handle: Option<&LogStreamHandle>) -> Option<String> {
    handle.map(|h| h.stream.clone())
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::http::StatusCode;
    use chrono::Utc;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use crate::domain::response::EXECUTION_ERROR_MESSAGE;
    use crate::domain::{CredentialRecord, TestRecord};
    use crate::logstream::LogSink;
    use crate::probe::{DatabaseDriver, DatabaseSession};
    use crate::secret::{SecretPayload, SecretStore};

    const VALID_SECRET: &str =
        r#"{"host":"db.internal","dbname":"app","username":"probe","password":"pw"}"#;

    fn valid_payload() -> SecretPayload {
        SecretPayload::Text(VALID_SECRET.to_string())
    }

    /// Sink that can be told to refuse stream creation.
    struct TestSink {
        fail_create: bool,
    }

    #[async_trait]
    impl LogSink for TestSink {
        async fn ensure_group(&self, _group: &str, _retention_days: i32) -> Result<(), ProbeError> {
            Ok(())
        }

        async fn create_stream(&self, _group: &str, _stream: &str) -> Result<(), ProbeError> {
            if self.fail_create {
                return Err(ProbeError::LogService("refused".to_string()));
            }
            Ok(())
        }

        async fn put_event(
            &self,
            _group: &str,
            _stream: &str,
            _timestamp_ms: i64,
            _message: &str,
        ) -> Result<(), ProbeError> {
            Ok(())
        }
    }

    struct TestStore {
        payload: Option<SecretPayload>,
        fetches: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl SecretStore for TestStore {
        async fn fetch(&self, _secret_id: &str) -> Result<SecretPayload, ProbeError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            match &self.payload {
                Some(p) => Ok(p.clone()),
                None => Err(ProbeError::SecretAccess {
                    code: "AccessDeniedException".to_string(),
                    message: "denied".to_string(),
                }),
            }
        }
    }

    struct TestDriver {
        connects: Arc<AtomicUsize>,
        closes: Arc<AtomicUsize>,
        fail_connect: bool,
    }

    #[async_trait]
    impl DatabaseDriver for TestDriver {
        async fn connect(
            &self,
            _credential: &CredentialRecord,
            timeout: Duration,
        ) -> Result<Box<dyn DatabaseSession>, ProbeError> {
            self.connects.fetch_add(1, Ordering::SeqCst);
            if self.fail_connect {
                return Err(ProbeError::Connection(format!(
                    "connection timed out after {}s",
                    timeout.as_secs()
                )));
            }
            Ok(Box::new(TestSession {
                closes: Arc::clone(&self.closes),
                deleted: false,
            }))
        }
    }

    struct TestSession {
        closes: Arc<AtomicUsize>,
        deleted: bool,
    }

    #[async_trait]
    impl DatabaseSession for TestSession {
        async fn begin(&mut self) -> Result<(), ProbeError> {
            Ok(())
        }

        async fn server_version(&mut self) -> Result<String, ProbeError> {
            Ok("PostgreSQL 16.3 (test)".to_string())
        }

        async fn ensure_probe_table(&mut self) -> Result<(), ProbeError> {
            Ok(())
        }

        async fn insert_marker(&mut self) -> Result<TestRecord, ProbeError> {
            Ok(TestRecord {
                id: 42,
                recorded_at: Utc::now(),
                note: "connectivity test".to_string(),
            })
        }

        async fn fetch_marker(&mut self, id: i32) -> Result<Option<TestRecord>, ProbeError> {
            if self.deleted {
                return Ok(None);
            }
            Ok(Some(TestRecord {
                id,
                recorded_at: Utc::now(),
                note: "connectivity test".to_string(),
            }))
        }

        async fn delete_marker(&mut self, _id: i32) -> Result<(), ProbeError> {
            self.deleted = true;
            Ok(())
        }

        async fn commit(&mut self) -> Result<(), ProbeError> {
            Ok(())
        }

        async fn close(self: Box<Self>) {
            self.closes.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct Fixture {
        orchestrator: ProbeOrchestrator,
        fetches: Arc<AtomicUsize>,
        connects: Arc<AtomicUsize>,
        closes: Arc<AtomicUsize>,
    }

    fn fixture(
        secret_id: Option<&str>,
        payload: Option<SecretPayload>,
        fail_connect: bool,
        fail_stream: bool,
    ) -> Fixture {
        let fetches = Arc::new(AtomicUsize::new(0));
        let connects = Arc::new(AtomicUsize::new(0));
        let closes = Arc::new(AtomicUsize::new(0));

        let resolver = SecretResolver::new(Arc::new(TestStore {
            payload,
            fetches: Arc::clone(&fetches),
        }));
        let logs = LogStreamManager::new(
            Arc::new(TestSink {
                fail_create: fail_stream,
            }),
            "/probe/test".to_string(),
            "execution-".to_string(),
            7,
        );
        let probe = ConnectivityProbe::new(
            Arc::new(TestDriver {
                connects: Arc::clone(&connects),
                closes: Arc::clone(&closes),
                fail_connect,
            }),
            Duration::from_secs(5),
        );

        Fixture {
            orchestrator: ProbeOrchestrator::new(
                secret_id.map(ToString::to_string),
                resolver,
                logs,
                probe,
            ),
            fetches,
            connects,
            closes,
        }
    }

    #[tokio::test]
    async fn valid_credentials_yield_full_success_envelope() {
        let fx = fixture(Some("db/creds"), Some(valid_payload()), false, false);

        let envelope = fx.orchestrator.execute().await;

        assert_eq!(envelope.status_code, StatusCode::OK);
        assert_eq!(envelope.body.version.as_deref(), Some("PostgreSQL 16.3 (test)"));
        let Some(record) = envelope.body.test_record else {
            panic!("expected a test record");
        };
        assert_eq!(envelope.body.deleted_record_id, Some(record.id));
        assert!(envelope.body.log_stream.is_some());
        assert_eq!(fx.closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn secret_failure_skips_database_entirely() {
        let fx = fixture(Some("db/creds"), None, false, false);

        let envelope = fx.orchestrator.execute().await;

        assert_eq!(envelope.status_code, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(fx.connects.load(Ordering::SeqCst), 0);
        let Some(error) = envelope.body.error else {
            panic!("expected an error message");
        };
        assert!(error.contains("AccessDeniedException"));
    }

    #[tokio::test]
    async fn missing_secret_id_never_touches_the_store() {
        let fx = fixture(None, Some(valid_payload()), false, false);

        let envelope = fx.orchestrator.execute().await;

        assert_eq!(envelope.status_code, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(fx.fetches.load(Ordering::SeqCst), 0);
        assert_eq!(fx.connects.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn connect_failure_yields_500_without_probe_fields() {
        let fx = fixture(Some("db/creds"), Some(valid_payload()), true, false);

        let envelope = fx.orchestrator.execute().await;

        assert_eq!(envelope.status_code, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(envelope.body.test_record.is_none());
        let Some(error) = envelope.body.error else {
            panic!("expected an error message");
        };
        assert!(error.contains("connection"));
        // Opened nothing, closed nothing.
        assert_eq!(fx.closes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn absent_log_stream_does_not_contaminate_success() {
        let fx = fixture(Some("db/creds"), Some(valid_payload()), false, true);

        let envelope = fx.orchestrator.execute().await;

        assert_eq!(envelope.status_code, StatusCode::OK);
        assert!(envelope.body.log_stream.is_none());
    }

    #[tokio::test]
    async fn back_to_back_executions_get_distinct_streams() {
        let fx = fixture(Some("db/creds"), Some(valid_payload()), false, false);

        let first = fx.orchestrator.execute().await;
        let second = fx.orchestrator.execute().await;

        let (Some(a), Some(b)) = (first.body.log_stream, second.body.log_stream) else {
            panic!("expected both invocations to carry a stream name");
        };
        // Same-second invocations must still get unique stream names.
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn binary_secret_payload_is_caught_at_the_top() {
        let fx = fixture(Some("db/creds"), Some(SecretPayload::Binary), false, false);

        let envelope = fx.orchestrator.execute().await;

        assert_eq!(envelope.status_code, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(fx.connects.load(Ordering::SeqCst), 0);
        // An orchestration-layer fault carries the generic execution
        // message and the stream name created before the fault.
        assert_eq!(envelope.body.message, EXECUTION_ERROR_MESSAGE);
        assert!(envelope.body.log_stream.is_some());
        let Some(error) = envelope.body.error else {
            panic!("expected an error message");
        };
        assert!(error.contains("secret"));
    }
}
