// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Error types for the song browser.
//!
//! Every variant is recoverable: the session controller catches them at its
//! boundary, logs them, and carries on with the host untouched.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the song browser
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BrowserError {
    /// A required host object is missing or in the wrong lifecycle state
    #[error("Host not ready: {0}")]
    HostNotReady(String),

    /// Selection index out of range or selection screen inactive
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    /// Settings could not be written (or read) from disk
    #[error("Failed to persist settings to {path:?}: {reason}")]
    ConfigPersistence {
        /// Settings file location
        path: PathBuf,
        /// Underlying failure, already formatted
        reason: String,
    },

    /// A catalog replacement was not a permutation of the current catalog
    #[error("Catalog replacement is not a permutation: {0}")]
    NotAPermutation(String),

    /// Sort mode name could not be parsed
    #[error("Unknown sort mode: {0}")]
    UnknownSortMode(String),
}

/// Convenience Result type using BrowserError
pub type Result<T> = std::result::Result<T, BrowserError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = BrowserError::HostNotReady("song list view".to_string());
        assert_eq!(err.to_string(), "Host not ready: song list view");

        let err = BrowserError::ConfigPersistence {
            path: PathBuf::from("/tmp/settings.yaml"),
            reason: "disk full".to_string(),
        };
        assert!(err.to_string().contains("settings.yaml"));
        assert!(err.to_string().contains("disk full"));
    }
}
