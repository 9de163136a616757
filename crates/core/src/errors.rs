use thiserror::Error;

/// Unified error type for the entire stock-events-core library.
/// Every fallible public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── File / Input ────────────────────────────────────────────────
    #[error("File I/O error: {0}")]
    FileIO(String),

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("Invalid record in {source_name} at row {row}: {message}")]
    InvalidRecord {
        source_name: String,
        row: usize,
        message: String,
    },

    #[error("Could not parse date: '{0}'")]
    InvalidDate(String),

    // ── Configuration ───────────────────────────────────────────────
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── Lookups / Business Logic ────────────────────────────────────
    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Ticker not found: {0}")]
    TickerNotFound(String),

    #[error("Market event not found: {0}")]
    EventNotFound(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<csv::Error> for CoreError {
    fn from(e: csv::Error) -> Self {
        // csv wraps I/O failures (missing file, permissions); keep them distinguishable
        if e.is_io_error() {
            return CoreError::FileIO(e.to_string());
        }
        CoreError::Csv(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}
