//! Probe error types with per-layer failure classification.
//!
//! [`ProbeError`] is the central error type. The enumeration is closed
//! so each layer can match exhaustively: the soft-fail logging layer
//! only ever produces [`ProbeError::LogService`], the probe layer
//! produces [`ProbeError::Connection`] or [`ProbeError::Unexpected`],
//! and the orchestration layer additionally sees the secret and
//! configuration variants. The distinction matters for diagnostics
//! only — every variant resolves to a 500 envelope; the caller-visible
//! taxonomy is the coarse 200/500 split.

/// Closed error enumeration for the probe pipeline.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    /// Operational connection failure: acquisition timeout,
    /// authentication, or network error while opening the connection.
    #[error("database connection failed: {0}")]
    Connection(String),

    /// The secret store rejected or failed the fetch; `code` carries
    /// the provider's error code (e.g. `ResourceNotFoundException`).
    #[error("secret store error ({code}): {message}")]
    SecretAccess {
        /// Provider-level error code.
        code: String,
        /// Provider-level error description.
        message: String,
    },

    /// The secret payload was binary or did not conform to the
    /// expected credential field set.
    #[error("unsupported secret format: {0}")]
    SecretFormat(String),

    /// The remote log service failed a group, stream, or emission
    /// call. Always absorbed by the soft-fail layer, never surfaced.
    #[error("log service error: {0}")]
    LogService(String),

    /// A required configuration key is absent.
    #[error("missing required configuration: {0}")]
    MissingConfig(&'static str),

    /// Any runtime fault past the connection step.
    #[error("database operation failed: {0}")]
    Unexpected(String),
}

impl ProbeError {
    /// Short machine-readable tag for structured local logging.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Connection(_) => "connection",
            Self::SecretAccess { .. } => "secret_access",
            Self::SecretFormat(_) => "secret_format",
            Self::LogService(_) => "log_service",
            Self::MissingConfig(_) => "missing_config",
            Self::Unexpected(_) => "unexpected",
        }
    }
}
