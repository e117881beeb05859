//! Error types for filter state and option loading.

use thiserror::Error;
use ucu_model::ModelError;

/// Contract violations by callers of the filter store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// A key outside the known filter dimensions.
    #[error("unknown filter key: {0}")]
    InvalidKey(String),
}

impl From<ModelError> for FilterError {
    fn from(error: ModelError) -> Self {
        match error {
            ModelError::InvalidKey(key) => FilterError::InvalidKey(key),
        }
    }
}

/// Failure of the external filter-options call.
///
/// Cloneable because one pending request may be awaited by several callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum LoadError {
    /// The request did not complete.
    #[error("network error: {0}")]
    Network(String),

    /// The service rejected the bearer token.
    #[error("not authorized to load filter options (HTTP {status})")]
    Unauthorized { status: u16 },

    /// Any other non-success status.
    #[error("filter options request failed with HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not a filter options document.
    #[error("invalid filter options response: {0}")]
    Decode(String),

    /// No token was available to authenticate the request.
    #[error("no bearer token available")]
    MissingToken,
}

impl LoadError {
    /// Returns a user-friendly error message suitable for display in the UI.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::Network(_) => "Could not reach the analytics service. Filter choices may be out of date.",
            Self::Unauthorized { .. } | Self::MissingToken => {
                "Your session has expired. Please sign in again."
            }
            Self::Status { .. } | Self::Decode(_) => {
                "The analytics service returned an unexpected response."
            }
        }
    }

    /// Returns whether a retry has a chance of succeeding.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Status { status, .. } => *status >= 500,
            Self::Unauthorized { .. } | Self::Decode(_) | Self::MissingToken => false,
        }
    }
}

/// Result type alias for filter store operations.
pub type Result<T> = std::result::Result<T, FilterError>;
