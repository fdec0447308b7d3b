//! Minting a new token with Metaplex metadata.
use solana_sdk::{
    program_pack::Pack,
    signature::{Keypair, Signer},
};
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use crate::{
    constants::get_create_token_poll_interval,
    domain::{
        address::{derive_associated_token_address, derive_metadata_address},
        instructions::{
            build_create_token_instructions, validate_token_metadata, CreateTokenInstructionParams,
        },
    },
    models::{CreateTokenRequest, TokenCreated, TokenManagerError},
    services::{keystore::KeyStoreTrait, provider::SolanaProviderTrait},
};

use super::TokenManager;

impl<P, K> TokenManager<P, K>
where
    P: SolanaProviderTrait + 'static,
    K: KeyStoreTrait + 'static,
{
    /// Creates a mint owned by the caller, mints `initial_supply` into the
    /// caller's associated token account and attaches metadata, all in one
    /// transaction.
    ///
    /// The mint key pair is written to `mint_key_file` before anything is
    /// submitted.
    #[instrument(
        level = "info",
        skip_all,
        fields(
            owner_key_file = %request.owner_key_file.display(),
            symbol = %request.symbol,
            initial_supply = request.initial_supply,
        )
    )]
    pub async fn create_token(
        &self,
        request: &CreateTokenRequest,
        cancel: &CancellationToken,
    ) -> Result<TokenCreated, TokenManagerError> {
        validate_token_metadata(&request.name, &request.symbol, &request.uri)?;
        let owner = self.keystore.load(&request.owner_key_file)?;
        let owner_address = owner.pubkey();

        Self::ensure_active(cancel)?;
        let balance = self
            .provider
            .get_balance(&owner_address)
            .await
            .map_err(|e| TokenManagerError::network("get_balance", e))?;
        info!(owner = %owner_address, balance, "owner balance before token creation");

        let mint = Keypair::new();
        let mint_address = mint.pubkey();
        self.keystore.store(&request.mint_key_file, &mint)?;
        info!(mint = %mint_address, "stored mint key pair");

        Self::ensure_active(cancel)?;
        let mint_rent_lamports = self
            .provider
            .get_minimum_balance_for_rent_exemption(spl_token::state::Mint::LEN)
            .await
            .map_err(|e| TokenManagerError::network("get_minimum_balance_for_rent_exemption", e))?;

        let associated_account = derive_associated_token_address(&owner_address, &mint_address)?;
        let metadata_account = derive_metadata_address(&mint_address)?;

        let instructions = build_create_token_instructions(&CreateTokenInstructionParams {
            owner: owner_address,
            mint: mint_address,
            associated_account,
            metadata_account,
            mint_rent_lamports,
            initial_supply: request.initial_supply,
            name: &request.name,
            symbol: &request.symbol,
            uri: &request.uri,
        })?;

        let receipt = self
            .submit_and_confirm(
                &instructions,
                &owner,
                &[&mint],
                get_create_token_poll_interval(),
                cancel,
            )
            .await?;

        info!(
            mint = %mint_address,
            associated_account = %associated_account,
            signature = %receipt.signature,
            "token created"
        );

        Ok(TokenCreated {
            mint: mint_address,
            associated_account,
            metadata_account,
            receipt,
        })
    }
}
