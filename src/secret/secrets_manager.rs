//! AWS Secrets Manager implementation of the secret store.

use async_trait::async_trait;
use aws_sdk_secretsmanager::Client;
use aws_sdk_secretsmanager::error::{DisplayErrorContext, ProvideErrorMetadata};

use super::{SecretPayload, SecretStore};
use crate::error::ProbeError;

/// Secret store backed by AWS Secrets Manager.
///
/// The client is constructed once per process and injected; it is a
/// stateless handle, safe to share across concurrent invocations.
#[derive(Debug, Clone)]
pub struct SecretsManagerStore {
    client: Client,
}

impl SecretsManagerStore {
    /// Creates a store over the given SDK client.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SecretStore for SecretsManagerStore {
    async fn fetch(&self, secret_id: &str) -> Result<SecretPayload, ProbeError> {
        let response = self
            .client
            .get_secret_value()
            .secret_id(secret_id)
            .send()
            .await
            .map_err(|e| ProbeError::SecretAccess {
                code: e.code().unwrap_or("Unknown").to_string(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        match response.secret_string() {
            Some(s) => Ok(SecretPayload::Text(s.to_string())),
            None => Ok(SecretPayload::Binary),
        }
    }
}
