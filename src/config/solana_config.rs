//! Network configuration read from the process environment.
//!
//! Environment variables used:
//! - SOLANA_USE_SANDBOX: "true" selects the sandbox endpoint and enables airdrops (default "false")
//! - SOLANA_API_URL: mainnet endpoint
//! - SOLANA_API_SANDBOX_URL: sandbox endpoint
//! - SOLANA_RPC_TIMEOUT_SECONDS: per-request RPC timeout
//! - SOLANA_CONFIRMATION_TIMEOUT_SECONDS: upper bound on the confirmation wait
//! - SOLANA_SUBMIT_ATTEMPTS: submissions allowed when the node reports an unknown blockhash
use std::{env, time::Duration};

use crate::constants::{
    DEFAULT_CONFIRMATION_TIMEOUT_SECONDS, DEFAULT_RPC_TIMEOUT_SECONDS,
    DEFAULT_SOLANA_API_URL, DEFAULT_SOLANA_SANDBOX_API_URL, DEFAULT_SUBMIT_ATTEMPTS,
};

#[derive(Debug, Clone, PartialEq)]
pub struct SolanaConfig {
    pub use_sandbox: bool,
    pub api_url: String,
    pub sandbox_api_url: String,
    pub rpc_timeout: Duration,
    pub confirmation_timeout: Duration,
    pub submit_attempts: u32,
}

impl Default for SolanaConfig {
    fn default() -> Self {
        Self {
            use_sandbox: false,
            api_url: DEFAULT_SOLANA_API_URL.to_string(),
            sandbox_api_url: DEFAULT_SOLANA_SANDBOX_API_URL.to_string(),
            rpc_timeout: Duration::from_secs(DEFAULT_RPC_TIMEOUT_SECONDS),
            confirmation_timeout: Duration::from_secs(DEFAULT_CONFIRMATION_TIMEOUT_SECONDS),
            submit_attempts: DEFAULT_SUBMIT_ATTEMPTS,
        }
    }
}

impl SolanaConfig {
    pub fn from_env() -> Self {
        Self {
            use_sandbox: env::var("SOLANA_USE_SANDBOX")
                .map(|v| v.trim().eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            api_url: env::var("SOLANA_API_URL")
                .unwrap_or_else(|_| DEFAULT_SOLANA_API_URL.to_string()),
            sandbox_api_url: env::var("SOLANA_API_SANDBOX_URL")
                .unwrap_or_else(|_| DEFAULT_SOLANA_SANDBOX_API_URL.to_string()),
            rpc_timeout: Duration::from_secs(
                env::var("SOLANA_RPC_TIMEOUT_SECONDS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_RPC_TIMEOUT_SECONDS),
            ),
            confirmation_timeout: Duration::from_secs(
                env::var("SOLANA_CONFIRMATION_TIMEOUT_SECONDS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_CONFIRMATION_TIMEOUT_SECONDS),
            ),
            submit_attempts: env::var("SOLANA_SUBMIT_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|attempts: &u32| *attempts > 0)
                .unwrap_or(DEFAULT_SUBMIT_ATTEMPTS),
        }
    }

    /// Endpoint the provider connects to.
    pub fn rpc_url(&self) -> &str {
        if self.use_sandbox {
            &self.sandbox_api_url
        } else {
            &self.api_url
        }
    }
}
