use thiserror::Error;

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("{0}")]
    Validation(String),

    #[error("kitty address '{0}' already exists")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    /// Token exchange or push rejected by the mobile-money provider. The
    /// raw provider body is kept so callers can surface it.
    #[error("gateway error (status {status}): {body}")]
    Gateway { status: u16, body: String },

    /// Best-effort side channel. Always caught and logged at the call
    /// site, never allowed to fail the primary operation.
    #[error("notification to '{recipient}' failed: {reason}")]
    Notification { recipient: String, reason: String },

    #[error("store error: {0}")]
    Store(String),
}

impl VaultError {
    pub fn missing(field: &str) -> Self {
        VaultError::Validation(format!("{field} is required"))
    }

    pub fn store(err: impl std::fmt::Display) -> Self {
        VaultError::Store(err.to_string())
    }
}
