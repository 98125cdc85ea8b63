/// Ignore-pattern compilation errors.
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    #[error("invalid regex `{pattern}`: {reason}")]
    InvalidRegex { pattern: String, reason: String },
}
