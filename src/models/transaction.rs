use std::fmt;

use serde::Serialize;
use solana_sdk::pubkey::Pubkey;

/// Result of a single status query for a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ConfirmationStatus {
    Pending,
    Confirmed,
    Failed(String),
}

/// Position of a transaction in its submission lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TransactionState {
    Built,
    Signed,
    Submitted,
    Pending,
    Confirmed,
    Failed(String),
}

impl TransactionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TransactionState::Confirmed | TransactionState::Failed(_))
    }
}

impl fmt::Display for TransactionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionState::Built => write!(f, "Built"),
            TransactionState::Signed => write!(f, "Signed"),
            TransactionState::Submitted => write!(f, "Submitted"),
            TransactionState::Pending => write!(f, "Pending"),
            TransactionState::Confirmed => write!(f, "Confirmed"),
            TransactionState::Failed(reason) => write!(f, "Failed({reason})"),
        }
    }
}

/// Outcome of a confirmed transaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionReceipt {
    pub signature: String,
    pub instruction_count: usize,
    pub state: TransactionState,
}

/// Addresses produced by a successful token creation.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenCreated {
    pub mint: Pubkey,
    pub associated_account: Pubkey,
    pub metadata_account: Pubkey,
    pub receipt: TransactionReceipt,
}
