/// Configuration loading and merging errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse TOML: {reason}")]
    ParseFailed { reason: String },

    #[error("config patch must be a JSON object, got {found}")]
    PatchNotAnObject { found: String },

    #[error("config patch rejected: {reason}")]
    PatchRejected { reason: String },

    #[error("no report url resolved for {monitor}")]
    MissingReportUrl { monitor: String },
}
