//! Native and SPL token transfers.
use solana_sdk::{message::Message, signature::Signer};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use crate::{
    constants::get_transfer_poll_interval,
    domain::{
        address::{derive_associated_token_address, parse_address},
        instructions::{
            build_transfer_sol_instructions, build_transfer_token_instructions,
            TransferTokenInstructionParams,
        },
    },
    models::{TokenManagerError, TransactionReceipt, TransferNativeRequest, TransferTokenRequest},
    services::{keystore::KeyStoreTrait, provider::SolanaProviderTrait},
};

use super::TokenManager;

impl<P, K> TokenManager<P, K>
where
    P: SolanaProviderTrait + 'static,
    K: KeyStoreTrait + 'static,
{
    /// Sends `amount_lamports` to `target_address`.
    ///
    /// The transfer is only submitted when the balance covers the amount plus
    /// the fee the node quotes for the exact message.
    #[instrument(
        level = "info",
        skip_all,
        fields(
            owner_key_file = %request.owner_key_file.display(),
            target = %request.target_address,
            amount_lamports = request.amount_lamports,
        )
    )]
    pub async fn transfer_sol(
        &self,
        request: &TransferNativeRequest,
        cancel: &CancellationToken,
    ) -> Result<TransactionReceipt, TokenManagerError> {
        let owner = self.keystore.load(&request.owner_key_file)?;
        let owner_address = owner.pubkey();
        let target = parse_address(&request.target_address)?;

        let instructions =
            build_transfer_sol_instructions(&owner_address, &target, request.amount_lamports);

        Self::ensure_active(cancel)?;
        let balance = self
            .provider
            .get_balance(&owner_address)
            .await
            .map_err(|e| TokenManagerError::network("get_balance", e))?;

        Self::ensure_active(cancel)?;
        let blockhash = self
            .provider
            .get_latest_blockhash()
            .await
            .map_err(|e| TokenManagerError::network("get_latest_blockhash", e))?;
        let mut message = Message::new(&instructions, Some(&owner_address));
        message.recent_blockhash = blockhash;

        Self::ensure_active(cancel)?;
        let fee = self
            .provider
            .get_fee_for_message(&message)
            .await
            .map_err(|e| TokenManagerError::network("get_fee_for_message", e))?;

        let required = request.amount_lamports.checked_add(fee);
        debug!(balance, fee, ?required, "checked transfer funding");
        match required {
            Some(required) if balance >= required => {}
            required => {
                return Err(TokenManagerError::InsufficientBalance {
                    required: required.unwrap_or(u64::MAX),
                    available: balance,
                })
            }
        }

        let receipt = self
            .submit_and_confirm(
                &instructions,
                &owner,
                &[],
                get_transfer_poll_interval(),
                cancel,
            )
            .await?;

        info!(signature = %receipt.signature, target = %target, "native transfer confirmed");
        Ok(receipt)
    }

    /// Moves `amount` of `token_mint` from the caller's associated token
    /// account to the recipient's, creating the recipient's account first when
    /// it does not exist yet.
    #[instrument(
        level = "info",
        skip_all,
        fields(
            owner_key_file = %request.owner_key_file.display(),
            target = %request.target_address,
            mint = %request.token_mint,
            amount = request.amount,
        )
    )]
    pub async fn transfer_spl_token(
        &self,
        request: &TransferTokenRequest,
        cancel: &CancellationToken,
    ) -> Result<TransactionReceipt, TokenManagerError> {
        let owner = self.keystore.load(&request.owner_key_file)?;
        let owner_address = owner.pubkey();
        let recipient = parse_address(&request.target_address)?;
        let mint = parse_address(&request.token_mint)?;

        let source_account = derive_associated_token_address(&owner_address, &mint)?;
        let destination_account = derive_associated_token_address(&recipient, &mint)?;
        let destination_exists = self.account_exists(&destination_account, cancel).await?;
        if !destination_exists {
            info!(
                destination_account = %destination_account,
                "recipient has no token account, creating it in the same transaction"
            );
        }

        let instructions = build_transfer_token_instructions(&TransferTokenInstructionParams {
            owner: owner_address,
            recipient,
            mint,
            source_account,
            destination_account,
            amount: request.amount,
            destination_exists,
        })?;

        let receipt = self
            .submit_and_confirm(
                &instructions,
                &owner,
                &[],
                get_transfer_poll_interval(),
                cancel,
            )
            .await?;

        info!(
            signature = %receipt.signature,
            destination_account = %destination_account,
            "token transfer confirmed"
        );
        Ok(receipt)
    }
}
