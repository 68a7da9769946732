//! PostgreSQL implementation of the probe database driver.
//!
//! Uses a single non-pooled `sqlx::PgConnection` per invocation with
//! an explicit `BEGIN`/`COMMIT` around the test statements. The probe
//! table is a session-scoped TEMP table, so it vanishes with the
//! connection even if cleanup is interrupted.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgConnectOptions;
use sqlx::{Connection, PgConnection};

use super::driver::{DatabaseDriver, DatabaseSession};
use crate::domain::{CredentialRecord, TestRecord};
use crate::error::ProbeError;

/// Marker text carried by every probe row.
const MARKER_TEXT: &str = "connectivity test";

/// Opens single non-pooled PostgreSQL connections.
#[derive(Debug, Clone, Copy, Default)]
pub struct PgDriver;

impl PgDriver {
    /// Creates the driver.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DatabaseDriver for PgDriver {
    async fn connect(
        &self,
        credential: &CredentialRecord,
        timeout: Duration,
    ) -> Result<Box<dyn DatabaseSession>, ProbeError> {
        let port: u16 = credential
            .port
            .parse()
            .map_err(|_| ProbeError::Connection(format!("invalid port '{}'", credential.port)))?;

        let options = PgConnectOptions::new()
            .host(&credential.host)
            .port(port)
            .database(&credential.database)
            .username(&credential.user)
            .password(&credential.password);

        let conn = tokio::time::timeout(timeout, PgConnection::connect_with(&options))
            .await
            .map_err(|_| {
                ProbeError::Connection(format!(
                    "connection to {} timed out after {}s",
                    credential.host,
                    timeout.as_secs()
                ))
            })?
            .map_err(|e| ProbeError::Connection(e.to_string()))?;

        Ok(Box::new(PgSession { conn }))
    }
}

/// One open PostgreSQL session holding the probe transaction.
struct PgSession {
    conn: PgConnection,
}

#[async_trait]
impl DatabaseSession for PgSession {
    async fn begin(&mut self) -> Result<(), ProbeError> {
        sqlx::query("BEGIN")
            .execute(&mut self.conn)
            .await
            .map_err(|e| ProbeError::Unexpected(e.to_string()))?;
        Ok(())
    }

    async fn server_version(&mut self) -> Result<String, ProbeError> {
        sqlx::query_scalar::<_, String>("SELECT version()")
            .fetch_one(&mut self.conn)
            .await
            .map_err(|e| ProbeError::Unexpected(e.to_string()))
    }

    async fn ensure_probe_table(&mut self) -> Result<(), ProbeError> {
        sqlx::query(
            "CREATE TEMP TABLE IF NOT EXISTS connectivity_probe (
                 id serial PRIMARY KEY,
                 recorded_at timestamptz NOT NULL,
                 note text NOT NULL
             )",
        )
        .execute(&mut self.conn)
        .await
        .map_err(|e| ProbeError::Unexpected(e.to_string()))?;
        Ok(())
    }

    async fn insert_marker(&mut self) -> Result<TestRecord, ProbeError> {
        let (id, recorded_at, note) =
            sqlx::query_as::<_, (i32, DateTime<Utc>, String)>(
                "INSERT INTO connectivity_probe (recorded_at, note) \
                 VALUES (current_timestamp, $1) RETURNING id, recorded_at, note",
            )
            .bind(MARKER_TEXT)
            .fetch_one(&mut self.conn)
            .await
            .map_err(|e| ProbeError::Unexpected(e.to_string()))?;

        Ok(TestRecord {
            id,
            recorded_at,
            note,
        })
    }

    async fn fetch_marker(&mut self, id: i32) -> Result<Option<TestRecord>, ProbeError> {
        let row = sqlx::query_as::<_, (i32, DateTime<Utc>, String)>(
            "SELECT id, recorded_at, note FROM connectivity_probe WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut self.conn)
        .await
        .map_err(|e| ProbeError::Unexpected(e.to_string()))?;

        Ok(row.map(|(id, recorded_at, note)| TestRecord {
            id,
            recorded_at,
            note,
        }))
    }

    async fn delete_marker(&mut self, id: i32) -> Result<(), ProbeError> {
        sqlx::query("DELETE FROM connectivity_probe WHERE id = $1")
            .bind(id)
            .execute(&mut self.conn)
            .await
            .map_err(|e| ProbeError::Unexpected(e.to_string()))?;
        Ok(())
    }

    async fn commit(&mut self) -> Result<(), ProbeError> {
        sqlx::query("COMMIT")
            .execute(&mut self.conn)
            .await
            .map_err(|e| ProbeError::Unexpected(e.to_string()))?;
        Ok(())
    }

    async fn close(self: Box<Self>) {
        if let Err(e) = self.conn.close().await {
            tracing::warn!(error = %e, "database connection close failed");
        }
    }
}
