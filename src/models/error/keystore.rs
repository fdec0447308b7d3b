use serde::Serialize;
use thiserror::Error;

/// Errors raised while reading or writing key files.
#[derive(Error, Debug, Serialize, Clone, PartialEq)]
pub enum KeyStoreError {
    #[error("Failed to read key file {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("Failed to write key file {path}: {reason}")]
    Write { path: String, reason: String },

    #[error("Malformed key file {path}: {reason}")]
    Parse { path: String, reason: String },

    #[error("Key file {path} holds mismatched keys: expected {expected}, derived {derived}")]
    PublicKeyMismatch {
        path: String,
        expected: String,
        derived: String,
    },
}
