use thiserror::Error;

/// Stable pointer to the troubleshooting documentation for batch failures
pub const BULK_SEND_HELP_URL: &str = "https://docs.bulkmail.dev/errors/bulk-send-failed";

/// Classification attached to batch-level failures, fixed for API parity
pub const BATCH_FAILURE_STATUS: u16 = 500;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Failure outside the per-recipient fan-out; the only error `send` returns
    #[error("Bulk email batch failed: {source} (see {help})")]
    Batch {
        status: u16,
        help: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl DispatchError {
    /// Wrap a pre-dispatch failure into the batch-level error
    pub fn batch(source: impl Into<anyhow::Error>) -> Self {
        Self::Batch {
            status: BATCH_FAILURE_STATUS,
            help: BULK_SEND_HELP_URL,
            source: source.into(),
        }
    }

    /// Status code for API responses
    pub fn status(&self) -> u16 {
        match self {
            Self::Config(_) => 500,
            Self::Batch { status, .. } => *status,
        }
    }
}

pub type Result<T> = std::result::Result<T, DispatchError>;
