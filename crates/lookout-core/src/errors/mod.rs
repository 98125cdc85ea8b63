mod config_error;
mod pattern_error;
mod transport_error;

pub use config_error::ConfigError;
pub use pattern_error::PatternError;
pub use transport_error::TransportError;

/// Root error type for the Lookout workspace.
#[derive(Debug, thiserror::Error)]
pub enum LookoutError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("pattern error: {0}")]
    Pattern(#[from] PatternError),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("monitor not running: {monitor}")]
    NotRunning { monitor: String },

    #[error("capability unavailable: {capability}")]
    Unsupported { capability: String },
}

/// Convenience alias used throughout the workspace.
pub type LookoutResult<T> = Result<T, LookoutError>;
