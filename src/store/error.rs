//! Errors raised by the rule store.

use std::path::PathBuf;

/// Errors that can occur while reading or persisting the rule table.
#[derive(Debug)]
pub enum StoreError {
    /// Reading or writing the data file failed.
    Io { path: PathBuf, source: std::io::Error },
    /// The data file does not contain a valid rule table.
    Serialization(serde_json::Error),
    /// A thread panicked while holding the table lock.
    Poisoned,
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io { path, source } => {
                write!(f, "I/O error on {}: {}", path.display(), source)
            }
            StoreError::Serialization(e) => write!(f, "Serialization error: {}", e),
            StoreError::Poisoned => write!(f, "Rule table lock poisoned"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io { source, .. } => Some(source),
            StoreError::Serialization(e) => Some(e),
            StoreError::Poisoned => None,
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e)
    }
}
