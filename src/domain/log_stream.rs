//! Remote log stream identity and event severity.

use std::fmt;

/// Identity of the per-invocation remote log stream.
///
/// Created at most once per invocation and immutable afterwards; all
/// later emissions reference it by shared borrow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogStreamHandle {
    /// Name of the backing log group.
    pub group: String,
    /// Name of the stream within the group.
    pub stream: String,
}

/// Severity tag rendered into remote log events as `[LEVEL] message`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Informational step-by-step progress.
    Info,
    /// Non-fatal diagnostic (e.g. cleanup verification failed).
    Warn,
    /// A transition into a failed outcome.
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => f.write_str("INFO"),
            Self::Warn => f.write_str("WARN"),
            Self::Error => f.write_str("ERROR"),
        }
    }
}
