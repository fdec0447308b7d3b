use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::services::provider::SolanaProviderError;

use super::KeyStoreError;

#[derive(Error, Debug, Serialize)]
pub enum TokenManagerError {
    #[error("Invalid key format: {0}")]
    InvalidKeyFormat(String),

    #[error("Network error during {operation}: {source}")]
    Network {
        operation: String,
        #[source]
        source: SolanaProviderError,
    },

    #[error("Insufficient balance: required {required} lamports, available {available}")]
    InsufficientBalance { required: u64, available: u64 },

    #[error("Address derivation error: {0}")]
    AddressDerivation(String),

    #[error("Transaction {signature} rejected: {reason}")]
    TransactionRejected { signature: String, reason: String },

    #[error("Failed to decode metadata for mint {mint}: {reason}")]
    MetadataDecode { mint: String, reason: String },

    #[error("Transaction {signature} not confirmed after {waited:?}")]
    ConfirmationTimeout { signature: String, waited: Duration },

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Key store error: {0}")]
    KeyStore(#[from] KeyStoreError),

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid transaction state transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },
}

impl TokenManagerError {
    /// Wraps a provider error with the name of the call that produced it.
    pub fn network(operation: &str, source: SolanaProviderError) -> Self {
        TokenManagerError::Network {
            operation: operation.to_string(),
            source,
        }
    }

    /// Determines whether building a fresh transaction may succeed where this one failed.
    ///
    /// **Transient:**
    /// - `Network`: delegates to the provider error's `is_transient()`
    /// - `ConfirmationTimeout`: the transaction may still land, or a new one may confirm
    ///
    /// **Permanent:** every other variant. Rejections, bad keys and local
    /// validation failures do not change on retry.
    pub fn is_transient(&self) -> bool {
        match self {
            TokenManagerError::Network { source, .. } => source.is_transient(),
            TokenManagerError::ConfirmationTimeout { .. } => true,

            TokenManagerError::InvalidKeyFormat(_)
            | TokenManagerError::InsufficientBalance { .. }
            | TokenManagerError::AddressDerivation(_)
            | TokenManagerError::TransactionRejected { .. }
            | TokenManagerError::MetadataDecode { .. }
            | TokenManagerError::Cancelled
            | TokenManagerError::KeyStore(_)
            | TokenManagerError::Signing(_)
            | TokenManagerError::InvalidRequest(_)
            | TokenManagerError::InvalidStateTransition { .. } => false,
        }
    }
}
