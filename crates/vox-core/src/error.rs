use thiserror::Error;

/// Top-level error type for the Vox delivery system.
///
/// Only two kinds of failure ever leave a delivery: the automation layer could
/// not be launched at all (clipboard unavailable, script runner missing or
/// blocked), or a second delivery was requested while one was still running.
/// A script that launches and then misbehaves is not an error here; the host
/// platform gives no signal for it.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VoxError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("Failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("A delivery is already in flight")]
    DeliveryInFlight,

    #[error("Invalid delivery state transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for VoxError {
    fn from(err: toml::de::Error) -> Self {
        VoxError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for VoxError {
    fn from(err: toml::ser::Error) -> Self {
        VoxError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for VoxError {
    fn from(err: serde_json::Error) -> Self {
        VoxError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Vox operations.
pub type Result<T> = std::result::Result<T, VoxError>;
