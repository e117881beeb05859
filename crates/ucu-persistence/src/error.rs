//! Persistence error types.
//!
//! Callers of [`crate::PersistenceAdapter::load`] never see these; they are
//! logged and replaced by the default state. Saves and explicit clears return
//! them so the caller can decide whether to tell anyone.

use std::path::PathBuf;
use thiserror::Error;

/// Persistence operation error.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Reading or writing a storage slot failed.
    #[error("Failed to {operation} storage key: {key}")]
    Storage {
        operation: &'static str,
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// Page state could not be encoded.
    #[error("Failed to serialize page state")]
    Serialization {
        #[source]
        source: serde_json::Error,
    },

    /// A stored snapshot is not valid page state.
    #[error("Failed to deserialize page state stored under: {key}")]
    Deserialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Atomic write failed (temp file couldn't be renamed).
    #[error("Failed to complete save operation")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing store cannot be used at all.
    #[error("Storage is unavailable: {0}")]
    Unavailable(String),
}

impl PersistenceError {
    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Storage { operation, key, .. } => {
                format!("Could not {operation} the saved state '{key}'.")
            }
            Self::Serialization { .. } => {
                "An error occurred while saving the page state.".to_string()
            }
            Self::Deserialization { key, .. } => {
                format!("The saved state '{key}' is corrupted and was ignored.")
            }
            Self::AtomicWriteFailed { target_path, .. } => {
                format!(
                    "Could not save the page state to {}. Please check disk space and permissions.",
                    target_path.display()
                )
            }
            Self::Unavailable(reason) => format!("Saved page state is unavailable: {reason}"),
        }
    }

    /// Get a suggestion for how to resolve this error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::Storage { operation, .. } => {
                if *operation == "read" {
                    Some("Check that the state directory exists and is readable.".into())
                } else {
                    Some("Check that you have permission to write to the state directory.".into())
                }
            }
            Self::Serialization { .. } => None,
            Self::Deserialization { .. } => {
                Some("Clear the saved state for this page to start fresh.".into())
            }
            Self::AtomicWriteFailed { .. } => {
                Some("Free up disk space or point the state directory elsewhere.".into())
            }
            Self::Unavailable(_) => Some("Check the configured storage directory.".into()),
        }
    }
}

/// Result type alias for persistence operations.
pub type Result<T> = std::result::Result<T, PersistenceError>;
