//! Secret resolution: fetch and strict validation of credentials.
//!
//! [`SecretResolver`] turns a secret identifier into a validated
//! [`CredentialRecord`]. The payload is parsed as strict JSON with the
//! exact field set `{host, port?, dbname, username, password}` and any
//! unknown field rejected — retrieved text is data, never code.

pub mod secrets_manager;

pub use secrets_manager::SecretsManagerStore;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::CredentialRecord;
use crate::domain::credential::DEFAULT_PORT;
use crate::error::ProbeError;

/// Raw payload returned by a secret store fetch.
#[derive(Debug, Clone)]
pub enum SecretPayload {
    /// A UTF-8 string payload, expected to be JSON.
    Text(String),
    /// A binary payload. Not supported by this probe.
    Binary,
}

/// Abstraction over the secret store backend.
///
/// The concrete implementation is [`SecretsManagerStore`]; tests use
/// in-memory stores.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Fetches the raw payload for `secret_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::SecretAccess`] on a provider-level
    /// failure (not found, access denied, throttled).
    async fn fetch(&self, secret_id: &str) -> Result<SecretPayload, ProbeError>;
}

/// Strict schema for the credential secret. Unknown fields are
/// rejected so a malformed or tampered payload cannot slip through.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCredential {
    host: String,
    #[serde(default = "default_port")]
    port: String,
    dbname: String,
    username: String,
    password: String,
}

fn default_port() -> String {
    DEFAULT_PORT.to_string()
}

/// Fetches and validates connection credentials.
#[derive(Clone)]
pub struct SecretResolver {
    store: Arc<dyn SecretStore>,
}

impl std::fmt::Debug for SecretResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretResolver").finish_non_exhaustive()
    }
}

impl SecretResolver {
    /// Creates a resolver over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn SecretStore>) -> Self {
        Self { store }
    }

    /// Fetches the secret and parses it into a [`CredentialRecord`].
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::SecretAccess`] when the store fails and
    /// [`ProbeError::SecretFormat`] when the payload is binary or does
    /// not conform to the expected field set.
    pub async fn resolve(&self, secret_id: &str) -> Result<CredentialRecord, ProbeError> {
        tracing::info!(secret_id, "retrieving database credentials");

        let raw = match self.store.fetch(secret_id).await? {
            SecretPayload::Text(s) => s,
            SecretPayload::Binary => {
                return Err(ProbeError::SecretFormat(
                    "binary secret payloads are not supported".to_string(),
                ));
            }
        };

        let parsed: RawCredential = serde_json::from_str(&raw)
            .map_err(|e| ProbeError::SecretFormat(format!("invalid credential payload: {e}")))?;

        tracing::info!("database credentials retrieved and validated");
        Ok(CredentialRecord {
            host: parsed.host,
            port: parsed.port,
            database: parsed.dbname,
            user: parsed.username,
            password: parsed.password,
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    struct FixedStore(SecretPayload);

    #[async_trait]
    impl SecretStore for FixedStore {
        async fn fetch(&self, _secret_id: &str) -> Result<SecretPayload, ProbeError> {
            Ok(self.0.clone())
        }
    }

    struct FailingStore;

    #[async_trait]
    impl SecretStore for FailingStore {
        async fn fetch(&self, _secret_id: &str) -> Result<SecretPayload, ProbeError> {
            Err(ProbeError::SecretAccess {
                code: "ResourceNotFoundException".to_string(),
                message: "secret not found".to_string(),
            })
        }
    }

    fn resolver(payload: SecretPayload) -> SecretResolver {
        SecretResolver::new(Arc::new(FixedStore(payload)))
    }

    #[tokio::test]
    async fn parses_full_payload() {
        let json = r#"{"host":"db.internal","port":"5433","dbname":"app",
                       "username":"probe","password":"pw"}"#;
        let resolver = resolver(SecretPayload::Text(json.to_string()));

        let Ok(cred) = resolver.resolve("db/creds").await else {
            panic!("expected valid credentials");
        };
        assert_eq!(cred.host, "db.internal");
        assert_eq!(cred.port, "5433");
        assert_eq!(cred.database, "app");
        assert_eq!(cred.user, "probe");
    }

    #[tokio::test]
    async fn port_defaults_when_absent() {
        let json = r#"{"host":"db.internal","dbname":"app","username":"probe","password":"pw"}"#;
        let resolver = resolver(SecretPayload::Text(json.to_string()));

        let Ok(cred) = resolver.resolve("db/creds").await else {
            panic!("expected valid credentials");
        };
        assert_eq!(cred.port, "5432");
    }

    #[tokio::test]
    async fn rejects_unknown_fields() {
        let json = r#"{"host":"h","dbname":"d","username":"u","password":"p","engine":"postgres"}"#;
        let resolver = resolver(SecretPayload::Text(json.to_string()));

        let result = resolver.resolve("db/creds").await;
        assert!(matches!(result, Err(ProbeError::SecretFormat(_))));
    }

    #[tokio::test]
    async fn rejects_missing_fields() {
        let json = r#"{"host":"h","dbname":"d"}"#;
        let resolver = resolver(SecretPayload::Text(json.to_string()));

        let result = resolver.resolve("db/creds").await;
        assert!(matches!(result, Err(ProbeError::SecretFormat(_))));
    }

    #[tokio::test]
    async fn rejects_non_json_payload() {
        let resolver = resolver(SecretPayload::Text("host=h password=p".to_string()));

        let result = resolver.resolve("db/creds").await;
        assert!(matches!(result, Err(ProbeError::SecretFormat(_))));
    }

    #[tokio::test]
    async fn rejects_binary_payload() {
        let resolver = resolver(SecretPayload::Binary);

        let result = resolver.resolve("db/creds").await;
        assert!(matches!(result, Err(ProbeError::SecretFormat(_))));
    }

    #[tokio::test]
    async fn propagates_store_errors() {
        let resolver = SecretResolver::new(Arc::new(FailingStore));

        let result = resolver.resolve("db/creds").await;
        let Err(ProbeError::SecretAccess { code, .. }) = result else {
            panic!("expected secret access error");
        };
        assert_eq!(code, "ResourceNotFoundException");
    }
}
