use thiserror::Error;

/// Error taxonomy shared by every caller.
///
/// Each variant carries enough context (the offending id, path or name) to
/// render a useful message. `kind()` is the stable machine-readable form
/// used by the CLI on stderr and by the MCP error payload.
#[derive(Error, Debug, Clone)]
pub enum AppError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },

    #[error("duplicate tag: {0}")]
    DuplicateTag(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("config error: {0}")]
    Config(String),
}

/// Result type alias for consistent error handling across the application
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }

    /// Stable kind string for structured callers.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "invalid_argument",
            Self::NotFound { .. } => "not_found",
            Self::DuplicateTag(_) => "duplicate_tag",
            Self::Conflict(_) => "conflict",
            Self::Storage(_) => "storage",
            Self::Config(_) => "config",
        }
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Storage(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_strings_are_stable() {
        assert_eq!(
            AppError::InvalidArgument("x".into()).kind(),
            "invalid_argument"
        );
        assert_eq!(AppError::not_found("prompt", "7").kind(), "not_found");
        assert_eq!(AppError::DuplicateTag("python".into()).kind(), "duplicate_tag");
        assert_eq!(AppError::Conflict("x".into()).kind(), "conflict");
        assert_eq!(AppError::Storage("x".into()).kind(), "storage");
    }

    #[test]
    fn not_found_message_names_the_entity() {
        let err = AppError::not_found("folder", "AI/Coding");
        assert_eq!(err.to_string(), "folder not found: AI/Coding");
    }
}
