use thiserror::Error;

/// Unified error type for the expense-charts-core library.
///
/// Only the data-store and device boundaries can fail; aggregation and
/// rendering are total over their inputs and never return this type.
#[derive(Debug, Error)]
pub enum ChartError {
    // ── Data store / Network ────────────────────────────────────────
    #[error("API error ({source_name}): {message}")]
    Api {
        source_name: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── Input ───────────────────────────────────────────────────────
    #[error("Invalid month key: {0} (expected YYYY-MM)")]
    InvalidMonthKey(String),

    #[error("Configuration error: {0}")]
    Config(String),

    // ── Device ──────────────────────────────────────────────────────
    #[error("Orientation lock failed: {0}")]
    Orientation(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<serde_json::Error> for ChartError {
    fn from(e: serde_json::Error) -> Self {
        ChartError::Deserialization(e.to_string())
    }
}

impl From<chrono::ParseError> for ChartError {
    fn from(e: chrono::ParseError) -> Self {
        ChartError::Deserialization(format!("invalid date: {e}"))
    }
}

impl From<reqwest::Error> for ChartError {
    fn from(e: reqwest::Error) -> Self {
        // PostgREST filters travel in the query string; keep them out of
        // user-visible notices and logs.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        ChartError::Network(sanitized)
    }
}
