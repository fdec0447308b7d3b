//! Solana Provider Module
//!
//! Abstraction over the Solana JSON-RPC surface used by the token manager:
//! balance and account queries, blockhash and fee lookups, token account
//! enumeration, transaction submission, status lookup, sandbox airdrops and
//! rent-exemption queries.
//!
//! The provider wraps the non-blocking `RpcClient` and classifies every client
//! failure into a `SolanaProviderError` so callers can tell transient failures
//! from permanent ones.
use std::{str::FromStr, time::Duration};

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::Serialize;
use solana_client::{
    client_error::{ClientError, ClientErrorKind},
    nonblocking::rpc_client::RpcClient,
    rpc_request::RpcRequest,
    rpc_response::{Response, RpcKeyedAccount},
};
use solana_sdk::{
    account::Account,
    commitment_config::CommitmentConfig,
    hash::Hash,
    message::Message,
    program_pack::Pack,
    pubkey::Pubkey,
    signature::Signature,
    transaction::{Transaction, TransactionError},
};
use thiserror::Error;
use tracing::debug;

use crate::{
    config::SolanaConfig,
    models::{ConfirmationStatus, TokenAccountEntry},
};

/// JSON-RPC error codes the Solana node reports, see
/// https://www.quicknode.com/docs/solana/error-references
const KNOWN_RPC_ERROR_CODES: [i64; 13] = [
    -32002, -32003, -32004, -32005, -32007, -32008, -32009, -32010, -32013, -32014, -32015,
    -32016, -32602,
];

/// Matches error patterns ignoring case and spaces, so "blockhash not found"
/// also matches "BlockhashNotFound".
fn matches_error_pattern(error_msg: &str, pattern: &str) -> bool {
    let normalized_msg = error_msg.to_lowercase().replace(' ', "");
    let normalized_pattern = pattern.to_lowercase().replace(' ', "");
    normalized_msg.contains(&normalized_pattern)
}

fn rpc_error_code(error_msg: &str) -> Option<i64> {
    KNOWN_RPC_ERROR_CODES
        .iter()
        .copied()
        .find(|code| error_msg.contains(&code.to_string()))
}

/// Errors that can occur when interacting with the Solana node.
///
/// Use `is_transient()` to determine if an error may succeed on retry.
#[derive(Error, Debug, Serialize)]
pub enum SolanaProviderError {
    /// Connection issues and timeouts
    #[error("Network error: {0}")]
    NetworkError(String),

    /// RPC-level issues such as node lag or pending sync
    #[error("RPC error: {0}")]
    RpcError(String),

    /// HTTP error with a status code
    #[error("Request error (HTTP {status_code}): {error}")]
    RequestError { error: String, status_code: u16 },

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Missing data or an unsupported endpoint
    #[error("Network configuration error: {0}")]
    NetworkConfiguration(String),

    #[error("Insufficient funds for transaction: {0}")]
    InsufficientFunds(String),

    /// The node does not know the transaction's blockhash; nothing was executed
    #[error("Blockhash not found or expired: {0}")]
    BlockhashNotFound(String),

    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),

    #[error("Transaction already processed: {0}")]
    AlreadyProcessed(String),
}

impl SolanaProviderError {
    /// Determines if this error is transient (can retry) or permanent (should fail).
    ///
    /// **Transient:** `NetworkError`, `RpcError`, `BlockhashNotFound`, and
    /// `RequestError` with a retriable status code (5xx except 501/505, 408, 425, 429).
    ///
    /// **Permanent:** everything else.
    pub fn is_transient(&self) -> bool {
        match self {
            SolanaProviderError::NetworkError(_)
            | SolanaProviderError::RpcError(_)
            | SolanaProviderError::BlockhashNotFound(_) => true,

            SolanaProviderError::RequestError { status_code, .. } => match *status_code {
                501 | 505 => false,
                500..=599 => true,
                408 | 425 | 429 => true,
                _ => false,
            },

            SolanaProviderError::InsufficientFunds(_)
            | SolanaProviderError::InvalidTransaction(_)
            | SolanaProviderError::AlreadyProcessed(_)
            | SolanaProviderError::InvalidAddress(_)
            | SolanaProviderError::NetworkConfiguration(_) => false,
        }
    }

    /// Classifies a Solana RPC client error.
    pub fn from_rpc_error(error: ClientError) -> Self {
        match error.kind() {
            ClientErrorKind::Io(_) => SolanaProviderError::NetworkError(error.to_string()),

            ClientErrorKind::Reqwest(reqwest_err) => match reqwest_err.status() {
                Some(status) => SolanaProviderError::RequestError {
                    error: error.to_string(),
                    status_code: status.as_u16(),
                },
                // connection refused, timeout
                None => SolanaProviderError::NetworkError(error.to_string()),
            },

            ClientErrorKind::RpcError(rpc_err) => {
                Self::from_rpc_response_error(&rpc_err.to_string(), &error)
            }

            ClientErrorKind::TransactionError(tx_error) => {
                Self::from_transaction_error(tx_error, &error)
            }

            ClientErrorKind::Custom(msg) => Self::from_rpc_response_error(msg, &error),

            _ => SolanaProviderError::RpcError(error.to_string()),
        }
    }

    /// Classifies a JSON-RPC error response by its code, falling back to the
    /// message text when the code is not one the node documents.
    ///
    /// Codes -32004, -32005, -32014 and -32016 mean the node is lagging and map
    /// to `RpcError`. -32008 is an unknown blockhash. -32007 and -32010 mean the
    /// requested data is unavailable on this node.
    fn from_rpc_response_error(error_msg: &str, full_error: &ClientError) -> Self {
        let detail = full_error.to_string();

        match rpc_error_code(error_msg) {
            // simulation failed, the message carries the cause
            Some(-32002) if matches_error_pattern(error_msg, "blockhash not found") => {
                SolanaProviderError::BlockhashNotFound(detail)
            }
            Some(-32002) if matches_error_pattern(error_msg, "insufficient funds") => {
                SolanaProviderError::InsufficientFunds(detail)
            }
            Some(-32008) => SolanaProviderError::BlockhashNotFound(detail),
            Some(-32009) => SolanaProviderError::AlreadyProcessed(detail),
            Some(-32002 | -32003 | -32013 | -32015 | -32602) => {
                SolanaProviderError::InvalidTransaction(detail)
            }
            Some(-32007 | -32010) => SolanaProviderError::NetworkConfiguration(detail),
            Some(_) => SolanaProviderError::RpcError(detail),
            None => {
                if matches_error_pattern(error_msg, "insufficient funds") {
                    SolanaProviderError::InsufficientFunds(detail)
                } else if matches_error_pattern(error_msg, "blockhash not found") {
                    SolanaProviderError::BlockhashNotFound(detail)
                } else if matches_error_pattern(error_msg, "already processed") {
                    SolanaProviderError::AlreadyProcessed(detail)
                } else {
                    SolanaProviderError::RpcError(detail)
                }
            }
        }
    }

    fn from_transaction_error(tx_error: &TransactionError, full_error: &ClientError) -> Self {
        let detail = full_error.to_string();

        match tx_error {
            TransactionError::InsufficientFundsForFee
            | TransactionError::InsufficientFundsForRent { .. } => {
                SolanaProviderError::InsufficientFunds(detail)
            }
            TransactionError::BlockhashNotFound => SolanaProviderError::BlockhashNotFound(detail),
            TransactionError::AlreadyProcessed => SolanaProviderError::AlreadyProcessed(detail),
            TransactionError::SignatureFailure
            | TransactionError::MissingSignatureForFee
            | TransactionError::InvalidAccountForFee
            | TransactionError::AccountNotFound
            | TransactionError::InvalidAccountIndex
            | TransactionError::ProgramAccountNotFound
            | TransactionError::InstructionError(_, _) => {
                SolanaProviderError::InvalidTransaction(detail)
            }
            _ => SolanaProviderError::RpcError(detail),
        }
    }
}

/// The RPC calls the token manager depends on. Each method is a single
/// network round-trip.
#[async_trait]
#[cfg_attr(test, automock)]
pub trait SolanaProviderTrait: Send + Sync {
    /// Retrieves the balance (in lamports) for the given address.
    async fn get_balance(&self, address: &Pubkey) -> Result<u64, SolanaProviderError>;

    async fn get_latest_blockhash(&self) -> Result<Hash, SolanaProviderError>;

    /// Fee the node would charge for the given message.
    async fn get_fee_for_message(&self, message: &Message) -> Result<u64, SolanaProviderError>;

    /// Retrieves an account. An account the node has no record of is `None`.
    async fn get_account(&self, address: &Pubkey) -> Result<Option<Account>, SolanaProviderError>;

    /// Lists every SPL token account owned by `owner`.
    async fn get_token_accounts_by_owner(
        &self,
        owner: &Pubkey,
    ) -> Result<Vec<TokenAccountEntry>, SolanaProviderError>;

    async fn send_transaction(
        &self,
        transaction: &Transaction,
    ) -> Result<Signature, SolanaProviderError>;

    /// Reports whether a submitted transaction is still pending, confirmed or failed.
    async fn get_transaction_status(
        &self,
        signature: &Signature,
    ) -> Result<ConfirmationStatus, SolanaProviderError>;

    /// Asks the faucet for lamports. Only sandbox clusters honour this.
    async fn request_airdrop(
        &self,
        address: &Pubkey,
        lamports: u64,
    ) -> Result<Signature, SolanaProviderError>;

    async fn get_minimum_balance_for_rent_exemption(
        &self,
        data_size: usize,
    ) -> Result<u64, SolanaProviderError>;
}

pub struct SolanaProvider {
    client: RpcClient,
    timeout: Duration,
    commitment: CommitmentConfig,
}

impl std::fmt::Debug for SolanaProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolanaProvider")
            .field("url", &self.client.url())
            .field("timeout", &self.timeout)
            .field("commitment", &self.commitment)
            .finish()
    }
}

impl SolanaProvider {
    pub fn new(config: &SolanaConfig) -> Result<Self, SolanaProviderError> {
        Self::new_with_commitment(config, CommitmentConfig::confirmed())
    }

    /// Creates a provider for the endpoint selected by `config`.
    ///
    /// # Errors
    ///
    /// Returns `NetworkConfiguration` when the endpoint is not an http(s) URL.
    pub fn new_with_commitment(
        config: &SolanaConfig,
        commitment: CommitmentConfig,
    ) -> Result<Self, SolanaProviderError> {
        let url = config.rpc_url().trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(SolanaProviderError::NetworkConfiguration(format!(
                "Invalid RPC URL: {url}"
            )));
        }

        debug!(
            url = %url,
            timeout_seconds = config.rpc_timeout.as_secs(),
            "creating solana rpc client"
        );

        Ok(Self {
            client: RpcClient::new_with_timeout_and_commitment(
                url.to_string(),
                config.rpc_timeout,
                commitment,
            ),
            timeout: config.rpc_timeout,
            commitment,
        })
    }

    pub fn url(&self) -> String {
        self.client.url()
    }
}

#[async_trait]
impl SolanaProviderTrait for SolanaProvider {
    async fn get_balance(&self, address: &Pubkey) -> Result<u64, SolanaProviderError> {
        self.client
            .get_balance(address)
            .await
            .map_err(SolanaProviderError::from_rpc_error)
    }

    async fn get_latest_blockhash(&self) -> Result<Hash, SolanaProviderError> {
        self.client
            .get_latest_blockhash()
            .await
            .map_err(SolanaProviderError::from_rpc_error)
    }

    async fn get_fee_for_message(&self, message: &Message) -> Result<u64, SolanaProviderError> {
        self.client
            .get_fee_for_message(message)
            .await
            .map_err(SolanaProviderError::from_rpc_error)
    }

    async fn get_account(&self, address: &Pubkey) -> Result<Option<Account>, SolanaProviderError> {
        self.client
            .get_account_with_commitment(address, self.commitment)
            .await
            .map(|response| response.value)
            .map_err(SolanaProviderError::from_rpc_error)
    }

    /// Queries `getTokenAccountsByOwner` with base64 encoding and unpacks the
    /// raw SPL token account layout.
    async fn get_token_accounts_by_owner(
        &self,
        owner: &Pubkey,
    ) -> Result<Vec<TokenAccountEntry>, SolanaProviderError> {
        let params = serde_json::json!([
            owner.to_string(),
            { "programId": spl_token::id().to_string() },
            { "encoding": "base64", "commitment": self.commitment.commitment },
        ]);

        let response: Response<Vec<RpcKeyedAccount>> = self
            .client
            .send(RpcRequest::GetTokenAccountsByOwner, params)
            .await
            .map_err(SolanaProviderError::from_rpc_error)?;

        response
            .value
            .into_iter()
            .map(|keyed| {
                let address = Pubkey::from_str(&keyed.pubkey).map_err(|e| {
                    SolanaProviderError::InvalidAddress(format!(
                        "Invalid token account {}: {e}",
                        keyed.pubkey
                    ))
                })?;
                let account: Account = keyed.account.decode().ok_or_else(|| {
                    SolanaProviderError::RpcError(format!(
                        "Token account {address} returned undecodable data"
                    ))
                })?;
                let token_account =
                    spl_token::state::Account::unpack(&account.data).map_err(|e| {
                        SolanaProviderError::RpcError(format!(
                            "Failed to unpack token account {address}: {e}"
                        ))
                    })?;

                Ok(TokenAccountEntry {
                    address,
                    mint: token_account.mint,
                    amount: token_account.amount,
                })
            })
            .collect()
    }

    async fn send_transaction(
        &self,
        transaction: &Transaction,
    ) -> Result<Signature, SolanaProviderError> {
        self.client
            .send_transaction(transaction)
            .await
            .map_err(SolanaProviderError::from_rpc_error)
    }

    async fn get_transaction_status(
        &self,
        signature: &Signature,
    ) -> Result<ConfirmationStatus, SolanaProviderError> {
        let response = self
            .client
            .get_signature_statuses(&[*signature])
            .await
            .map_err(SolanaProviderError::from_rpc_error)?;

        // the node has not seen the signature yet
        let Some(status) = response.value.into_iter().next().flatten() else {
            return Ok(ConfirmationStatus::Pending);
        };

        if let Some(err) = status.err {
            Ok(ConfirmationStatus::Failed(err.to_string()))
        } else if status.satisfies_commitment(self.commitment) {
            Ok(ConfirmationStatus::Confirmed)
        } else {
            Ok(ConfirmationStatus::Pending)
        }
    }

    async fn request_airdrop(
        &self,
        address: &Pubkey,
        lamports: u64,
    ) -> Result<Signature, SolanaProviderError> {
        self.client
            .request_airdrop(address, lamports)
            .await
            .map_err(SolanaProviderError::from_rpc_error)
    }

    async fn get_minimum_balance_for_rent_exemption(
        &self,
        data_size: usize,
    ) -> Result<u64, SolanaProviderError> {
        self.client
            .get_minimum_balance_for_rent_exemption(data_size)
            .await
            .map_err(SolanaProviderError::from_rpc_error)
    }
}
