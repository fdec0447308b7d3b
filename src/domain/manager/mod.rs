//! Token manager
//!
//! `TokenManager` is the explicit context every operation runs against. It
//! holds the chain provider, the key store and the network configuration, and
//! drives each write operation through build, sign, submit and confirm.
//!
//! Operations are split by concern:
//! - `account`: account creation and account inspection
//! - `token`: minting a new token with metadata
//! - `transfer`: native and SPL token transfers
use std::{sync::Arc, time::Duration};

use solana_sdk::{
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signer},
    transaction::Transaction,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    config::SolanaConfig,
    models::{TokenManagerError, TransactionReceipt, TransactionState},
    services::{
        keystore::{FileKeyStore, KeyStoreTrait},
        provider::{SolanaProvider, SolanaProviderError, SolanaProviderTrait},
    },
};

use super::{
    confirmation::{wait_for_confirmation, ConfirmationPolicy},
    lifecycle::TransactionLifecycle,
};

mod account;
mod token;
mod transfer;

#[cfg(test)]
mod test_utils;

pub struct TokenManager<P, K>
where
    P: SolanaProviderTrait + 'static,
    K: KeyStoreTrait + 'static,
{
    provider: Arc<P>,
    keystore: Arc<K>,
    config: SolanaConfig,
}

pub type DefaultTokenManager = TokenManager<SolanaProvider, FileKeyStore>;

impl<P, K> TokenManager<P, K>
where
    P: SolanaProviderTrait + 'static,
    K: KeyStoreTrait + 'static,
{
    pub fn new(provider: Arc<P>, keystore: Arc<K>, config: SolanaConfig) -> Self {
        Self {
            provider,
            keystore,
            config,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn keystore(&self) -> &K {
        &self.keystore
    }

    pub fn config(&self) -> &SolanaConfig {
        &self.config
    }

    /// Fails with `Cancelled` once the caller has cancelled the operation.
    fn ensure_active(cancel: &CancellationToken) -> Result<(), TokenManagerError> {
        if cancel.is_cancelled() {
            return Err(TokenManagerError::Cancelled);
        }
        Ok(())
    }

    /// Whether `address` holds an account owned by the token program.
    ///
    /// An account the node does not know and an account owned by any other
    /// program both count as "does not exist".
    pub async fn account_exists(
        &self,
        address: &Pubkey,
        cancel: &CancellationToken,
    ) -> Result<bool, TokenManagerError> {
        Self::ensure_active(cancel)?;
        let account = self
            .provider
            .get_account(address)
            .await
            .map_err(|e| TokenManagerError::network("get_account", e))?;

        let exists = matches!(account, Some(ref account) if account.owner == spl_token::id());
        debug!(address = %address, exists, "checked token account existence");
        Ok(exists)
    }

    /// Signs `instructions` against a fresh blockhash, submits them and waits
    /// for confirmation.
    ///
    /// When the node rejects a submission because it does not know the
    /// blockhash, nothing was executed, so the same instructions are signed
    /// again with a new blockhash, up to `submit_attempts` times. Once the node
    /// accepts a transaction it is never submitted again.
    async fn submit_and_confirm(
        &self,
        instructions: &[Instruction],
        payer: &Keypair,
        co_signers: &[&Keypair],
        poll_interval: Duration,
        cancel: &CancellationToken,
    ) -> Result<TransactionReceipt, TokenManagerError> {
        let payer_address = payer.pubkey();
        let mut signers: Vec<&Keypair> = Vec::with_capacity(co_signers.len() + 1);
        signers.push(payer);
        signers.extend_from_slice(co_signers);

        let max_attempts = self.config.submit_attempts.max(1);
        let mut attempt = 0;

        let (signature, mut lifecycle) = loop {
            attempt += 1;

            Self::ensure_active(cancel)?;
            let blockhash = self
                .provider
                .get_latest_blockhash()
                .await
                .map_err(|e| TokenManagerError::network("get_latest_blockhash", e))?;

            let mut lifecycle = TransactionLifecycle::new();
            let mut transaction = Transaction::new_with_payer(instructions, Some(&payer_address));
            transaction
                .try_sign(&signers[..], blockhash)
                .map_err(|e| TokenManagerError::Signing(e.to_string()))?;
            lifecycle.advance(TransactionState::Signed)?;

            Self::ensure_active(cancel)?;
            match self.provider.send_transaction(&transaction).await {
                Ok(signature) => {
                    lifecycle.advance(TransactionState::Submitted)?;
                    break (signature, lifecycle);
                }
                Err(SolanaProviderError::BlockhashNotFound(reason)) if attempt < max_attempts => {
                    warn!(
                        attempt,
                        max_attempts,
                        reason = %reason,
                        "node rejected blockhash, signing again with a fresh one"
                    );
                }
                Err(e) => return Err(TokenManagerError::network("send_transaction", e)),
            }
        };

        info!(
            signature = %signature,
            instruction_count = instructions.len(),
            attempt,
            "transaction submitted"
        );

        let policy = ConfirmationPolicy::new(poll_interval, self.config.confirmation_timeout);
        wait_for_confirmation(
            self.provider.as_ref(),
            &signature,
            &mut lifecycle,
            policy,
            cancel,
        )
        .await?;

        Ok(TransactionReceipt {
            signature: signature.to_string(),
            instruction_count: instructions.len(),
            state: lifecycle.state().clone(),
        })
    }
}
