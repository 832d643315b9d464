use thiserror::Error;

/// Errors surfaced by an identity cache store.
///
/// Missing records are not errors; lookups return an empty result instead.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid lookup filter '{filter}': {message}")]
    InvalidFilter { filter: String, message: String },

    #[error("Store backend error: {0}")]
    Backend(String),

    #[error("Store internal error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Create a new InvalidFilter error
    pub fn invalid_filter(filter: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidFilter {
            filter: filter.into(),
            message: message.into(),
        }
    }

    /// Create a new Backend error
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }

    /// Create a new Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

/// Errors surfaced by a provider backend refresh call.
///
/// `Clone` so a coalesced outcome can fan out to every waiter unchanged.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    /// The provider could not be reached or answered too slowly. The engine
    /// advances to the next candidate domain.
    #[error("Transient provider error: {0}")]
    Transient(String),

    /// The provider rejected the request outright. Aborts the request.
    #[error("Fatal provider error: {0}")]
    Fatal(String),
}

impl ProviderError {
    /// Create a new Transient error
    pub fn transient(message: impl Into<String>) -> Self {
        Self::Transient(message.into())
    }

    /// Create a new Fatal error
    pub fn fatal(message: impl Into<String>) -> Self {
        Self::Fatal(message.into())
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}
