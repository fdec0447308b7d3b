//! Constants for Solana transaction submission and confirmation.
//!
//! Poll intervals differ per operation: token creation is polled eagerly,
//! transfers are polled at a slower cadence.

use std::time::Duration;

/// Poll interval while waiting for a token creation transaction (in seconds)
pub const CREATE_TOKEN_POLL_INTERVAL_SECONDS: u64 = 1;

/// Poll interval while waiting for a native or token transfer (in seconds)
pub const TRANSFER_POLL_INTERVAL_SECONDS: u64 = 10;

/// Default upper bound on the confirmation wait (in seconds)
pub const DEFAULT_CONFIRMATION_TIMEOUT_SECONDS: u64 = 120;

/// Default RPC request timeout (in seconds)
pub const DEFAULT_RPC_TIMEOUT_SECONDS: u64 = 30;

/// Default number of submissions allowed when the node reports an unknown blockhash
pub const DEFAULT_SUBMIT_ATTEMPTS: u32 = 3;

/// Get the poll interval used for token creation
pub fn get_create_token_poll_interval() -> Duration {
    Duration::from_secs(CREATE_TOKEN_POLL_INTERVAL_SECONDS)
}

/// Get the poll interval used for transfers
pub fn get_transfer_poll_interval() -> Duration {
    Duration::from_secs(TRANSFER_POLL_INTERVAL_SECONDS)
}
