//! Validated database connection credentials.

use std::fmt;

/// Default PostgreSQL port used when the secret payload omits one.
pub const DEFAULT_PORT: &str = "5432";

/// The validated connection tuple produced by secret resolution.
///
/// Created once per invocation, owned exclusively by that invocation,
/// and discarded when it ends. Never persisted.
#[derive(Clone)]
pub struct CredentialRecord {
    /// Database host name.
    pub host: String,
    /// Database port as a decimal string (defaults to `"5432"`).
    pub port: String,
    /// Database name.
    pub database: String,
    /// Login role.
    pub user: String,
    /// Login password.
    pub password: String,
}

// Manual Debug so the password never reaches the process log.
impl fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}
