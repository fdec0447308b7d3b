//! Account creation and account inspection.
use base64::{engine::general_purpose::STANDARD, Engine};
use mpl_token_metadata::accounts::Metadata;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signer},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::{
    constants::SANDBOX_AIRDROP_LAMPORTS,
    domain::address::derive_metadata_address,
    models::{
        AccountInfoRequest, AccountSnapshot, CreateAccountRequest, OwnedToken, TokenAccountEntry,
        TokenManagerError,
    },
    services::{keystore::KeyStoreTrait, provider::SolanaProviderTrait},
};

use super::TokenManager;

/// Name, symbol and uri of a mint, as stored in its metadata account.
struct TokenMetadataFields {
    name: String,
    symbol: String,
    uri: String,
}

/// Metadata strings are stored NUL padded to their maximum length.
fn trim_padding(value: &str) -> String {
    value.trim_end_matches('\u{0}').to_string()
}

impl<P, K> TokenManager<P, K>
where
    P: SolanaProviderTrait + 'static,
    K: KeyStoreTrait + 'static,
{
    /// Generates a key pair and writes it to `output_key_file`.
    ///
    /// On the sandbox cluster the new account is funded from the faucet first.
    /// A failed airdrop is logged and does not fail the operation; an unfunded
    /// account is still a valid result.
    #[instrument(
        level = "info",
        skip_all,
        fields(output_key_file = %request.output_key_file.display())
    )]
    pub async fn create_account(
        &self,
        request: &CreateAccountRequest,
        cancel: &CancellationToken,
    ) -> Result<Keypair, TokenManagerError> {
        let keypair = Keypair::new();
        let address = keypair.pubkey();

        info!(address = %address, "generated account key pair");

        if self.config.use_sandbox {
            Self::ensure_active(cancel)?;
            match self
                .provider
                .request_airdrop(&address, SANDBOX_AIRDROP_LAMPORTS)
                .await
            {
                Ok(signature) => info!(
                    address = %address,
                    lamports = SANDBOX_AIRDROP_LAMPORTS,
                    signature = %signature,
                    "requested sandbox airdrop"
                ),
                Err(e) => warn!(address = %address, error = %e, "sandbox airdrop failed"),
            }
        }

        self.keystore.store(&request.output_key_file, &keypair)?;
        info!(address = %address, "stored account key pair");

        Ok(keypair)
    }

    /// Read-only view of the account stored in `owner_key_file` and every
    /// token it holds.
    #[instrument(
        level = "info",
        skip_all,
        fields(owner_key_file = %request.owner_key_file.display())
    )]
    pub async fn account_info(
        &self,
        request: &AccountInfoRequest,
        cancel: &CancellationToken,
    ) -> Result<AccountSnapshot, TokenManagerError> {
        let owner = self.keystore.load(&request.owner_key_file)?.pubkey();

        Self::ensure_active(cancel)?;
        let balance = self
            .provider
            .get_balance(&owner)
            .await
            .map_err(|e| TokenManagerError::network("get_balance", e))?;

        Self::ensure_active(cancel)?;
        let account = self
            .provider
            .get_account(&owner)
            .await
            .map_err(|e| TokenManagerError::network("get_account", e))?;

        Self::ensure_active(cancel)?;
        let token_accounts = self
            .provider
            .get_token_accounts_by_owner(&owner)
            .await
            .map_err(|e| TokenManagerError::network("get_token_accounts_by_owner", e))?;

        let mut owned_tokens = Vec::with_capacity(token_accounts.len());
        for entry in token_accounts {
            owned_tokens.push(self.describe_token_account(entry, cancel).await?);
        }

        let snapshot = match account {
            Some(account) => AccountSnapshot {
                public_key: owner.to_string(),
                balance,
                exists: true,
                is_system: account.owner == solana_system_interface::program::id(),
                is_smart_contract: account.executable,
                rent_epoch: account.rent_epoch,
                data: STANDARD.encode(&account.data),
                owned_tokens,
            },
            None => AccountSnapshot {
                public_key: owner.to_string(),
                balance,
                exists: false,
                is_system: false,
                is_smart_contract: false,
                rent_epoch: 0,
                data: String::new(),
                owned_tokens,
            },
        };

        debug!(
            address = %owner,
            exists = snapshot.exists,
            token_count = snapshot.owned_tokens.len(),
            "collected account info"
        );
        Ok(snapshot)
    }

    async fn describe_token_account(
        &self,
        entry: TokenAccountEntry,
        cancel: &CancellationToken,
    ) -> Result<OwnedToken, TokenManagerError> {
        let metadata = self.fetch_token_metadata(&entry.mint, cancel).await?;
        let (name, symbol, uri) = match metadata {
            Some(fields) => (Some(fields.name), Some(fields.symbol), Some(fields.uri)),
            None => (None, None, None),
        };

        Ok(OwnedToken {
            public_key: entry.address.to_string(),
            mint_public_key: entry.mint.to_string(),
            amount: entry.amount,
            name,
            symbol,
            uri,
        })
    }

    /// Metadata of `mint`, or `None` when the mint has no metadata account or
    /// the account is empty.
    async fn fetch_token_metadata(
        &self,
        mint: &Pubkey,
        cancel: &CancellationToken,
    ) -> Result<Option<TokenMetadataFields>, TokenManagerError> {
        let metadata_address = derive_metadata_address(mint)?;

        Self::ensure_active(cancel)?;
        let account = self
            .provider
            .get_account(&metadata_address)
            .await
            .map_err(|e| TokenManagerError::network("get_account", e))?;

        let Some(account) = account.filter(|account| !account.data.is_empty()) else {
            debug!(mint = %mint, "mint has no metadata");
            return Ok(None);
        };

        let metadata =
            Metadata::from_bytes(&account.data).map_err(|e| TokenManagerError::MetadataDecode {
                mint: mint.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Some(TokenMetadataFields {
            name: trim_padding(&metadata.name),
            symbol: trim_padding(&metadata.symbol),
            uri: trim_padding(&metadata.uri),
        }))
    }
}
