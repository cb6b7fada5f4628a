use thiserror::Error;

/// Unified error type for the entire portfolio-analyzer-core library.
/// Every public fallible function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Session / Auth ──────────────────────────────────────────────
    #[error("No active session — sign in first")]
    MissingSession,

    #[error("Auth error: {message}")]
    Auth { message: String },

    // ── Data store ──────────────────────────────────────────────────
    #[error("Store error: {message}")]
    Store { message: String },

    #[error("Portfolio not found: {0}")]
    PortfolioNotFound(String),

    // ── Network / Wire ──────────────────────────────────────────────
    #[error("Network error: {0}")]
    Network(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── Input validation ────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    Validation(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // Sanitize error message: strip query parameters from URLs so the
        // backend API key never ends up in a toast or a log line.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}
