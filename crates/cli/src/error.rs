use stock_events_core::errors::CoreError;
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Core(CoreError::ValidationError(_))
            | Self::Core(CoreError::TickerNotFound(_))
            | Self::Core(CoreError::EventNotFound(_)) => 2,
            Self::Core(CoreError::Config(_)) => 3,
            Self::Core(_) => 4,
            Self::Serialization(_) => 5,
            Self::Io(_) => 10,
        }
    }
}
