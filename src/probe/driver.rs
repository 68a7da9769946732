//! Database driver abstraction for the connectivity probe.
//!
//! The probe algorithm runs against these traits so the full
//! connect/test/cleanup sequence is testable without a live database.
//! The concrete implementation is [`PgDriver`](super::postgres::PgDriver).

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{CredentialRecord, TestRecord};
use crate::error::ProbeError;

/// Opens per-invocation database sessions.
#[async_trait]
pub trait DatabaseDriver: Send + Sync {
    /// Opens a connection bounded by `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Connection`] on timeout, authentication,
    /// or network failure.
    async fn connect(
        &self,
        credential: &CredentialRecord,
        timeout: Duration,
    ) -> Result<Box<dyn DatabaseSession>, ProbeError>;
}

/// One open database session carrying the probe transaction.
///
/// Sessions are never pooled or reused across invocations. The owner
/// must call [`close`](DatabaseSession::close) exactly once on every
/// exit path.
#[async_trait]
pub trait DatabaseSession: Send {
    /// Begins the probe transaction. Runs after the session is open
    /// so a failure here still flows through the owner's close site.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Unexpected`] on statement failure.
    async fn begin(&mut self) -> Result<(), ProbeError>;

    /// Returns the server version string.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Unexpected`] on query failure.
    async fn server_version(&mut self) -> Result<String, ProbeError>;

    /// Creates the session-scoped probe table if absent. The table
    /// has a serial primary key (`id serial PRIMARY KEY`).
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Unexpected`] on statement failure.
    async fn ensure_probe_table(&mut self) -> Result<(), ProbeError>;

    /// Inserts one marker row, returning the full inserted row in the
    /// same round trip.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Unexpected`] on statement failure.
    async fn insert_marker(&mut self) -> Result<TestRecord, ProbeError>;

    /// Reads the marker row by id, or `None` when it is not visible.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Unexpected`] on query failure.
    async fn fetch_marker(&mut self, id: i32) -> Result<Option<TestRecord>, ProbeError>;

    /// Deletes the marker row by id.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Unexpected`] on statement failure.
    async fn delete_marker(&mut self, id: i32) -> Result<(), ProbeError>;

    /// Commits the probe transaction.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Unexpected`] on commit failure.
    async fn commit(&mut self) -> Result<(), ProbeError>;

    /// Closes the session. Infallible from the caller's perspective;
    /// close failures are logged locally.
    async fn close(self: Box<Self>);
}
