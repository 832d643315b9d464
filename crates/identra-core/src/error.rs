use thiserror::Error;

/// Core error types for identra operations
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid identity name: {0}")]
    InvalidName(String),

    #[error("Invalid numeric id: {0}")]
    InvalidId(String),

    #[error("Invalid lookup filter: {0}")]
    InvalidFilter(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Unknown domain: {0}")]
    UnknownDomain(String),
}

impl CoreError {
    /// Create a new InvalidName error
    pub fn invalid_name(name: impl Into<String>) -> Self {
        Self::InvalidName(name.into())
    }

    /// Create a new InvalidId error
    pub fn invalid_id(id: impl Into<String>) -> Self {
        Self::InvalidId(id.into())
    }

    /// Create a new InvalidFilter error
    pub fn invalid_filter(filter: impl Into<String>) -> Self {
        Self::InvalidFilter(filter.into())
    }

    /// Create a new InvalidTimestamp error
    pub fn invalid_timestamp(message: impl Into<String>) -> Self {
        Self::InvalidTimestamp(message.into())
    }

    /// Create a new UnknownDomain error
    pub fn unknown_domain(domain: impl Into<String>) -> Self {
        Self::UnknownDomain(domain.into())
    }

    /// Get error category for logging/monitoring
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidName(_) | Self::InvalidId(_) | Self::InvalidFilter(_) => {
                ErrorCategory::Validation
            }
            Self::InvalidTimestamp(_) => ErrorCategory::System,
            Self::UnknownDomain(_) => ErrorCategory::NotFound,
        }
    }
}

/// Error categories for monitoring and classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    System,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::NotFound => write!(f, "not_found"),
            Self::System => write!(f, "system"),
        }
    }
}

/// Convenience result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
