use identra_store::StoreError;
use thiserror::Error;

/// Terminal error kinds of one cache request.
///
/// `NotFound` is a normal terminal outcome, not a failure; callers and log
/// layers should branch on [`RequestError::category`] before treating a
/// request error as noteworthy.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Identity not found")]
    NotFound,

    /// Plugin contract violation, e.g. a required precondition is missing.
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Unknown domain: {0}")]
    UnknownDomain(String),

    /// The provider for one domain could not be reached. Absorbed while
    /// other domains remain; reported instead of a silent `NotFound` when
    /// none do.
    #[error("Transient backend error in domain {domain}: {message}")]
    TransientBackend { domain: String, message: String },

    #[error("Fatal backend error: {0}")]
    FatalBackend(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl RequestError {
    /// Create a new Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a new UnknownDomain error
    pub fn unknown_domain(domain: impl Into<String>) -> Self {
        Self::UnknownDomain(domain.into())
    }

    /// Create a new TransientBackend error
    pub fn transient_backend(domain: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TransientBackend {
            domain: domain.into(),
            message: message.into(),
        }
    }

    /// Create a new FatalBackend error
    pub fn fatal_backend(message: impl Into<String>) -> Self {
        Self::FatalBackend(message.into())
    }

    /// Create a new Configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    /// Whether this error aborts the whole request rather than the current
    /// domain attempt.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Internal(_) | Self::FatalBackend(_) | Self::Store(_) | Self::Configuration(_)
        )
    }

    /// Get error category for logging/monitoring
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound => ErrorCategory::NotFound,
            Self::UnknownDomain(_) => ErrorCategory::NotFound,
            Self::TransientBackend { .. } => ErrorCategory::Transient,
            Self::Internal(_) | Self::FatalBackend(_) | Self::Store(_) | Self::Configuration(_) => {
                ErrorCategory::Fatal
            }
        }
    }
}

/// Error categories for monitoring and classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    NotFound,
    Transient,
    Fatal,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::Transient => write!(f, "transient"),
            Self::Fatal => write!(f, "fatal"),
        }
    }
}

/// Convenience result type for request operations
pub type Result<T> = std::result::Result<T, RequestError>;
