use thiserror::Error;

/// Common error type for macsight components.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid log filter '{directive}': {reason}")]
    LogFilter { directive: String, reason: String },

    #[error("Logging setup failed: {0}")]
    Logging(String),
}

/// Result type alias using macsight's Error.
pub type Result<T> = std::result::Result<T, Error>;
