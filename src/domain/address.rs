//! Program-derived address computation.
//!
//! Derived addresses are never stored; they are recomputed from the owner and
//! mint whenever an operation needs them.
use std::str::FromStr;

use solana_sdk::pubkey::Pubkey;

use crate::models::TokenManagerError;

/// Seed prefix the Metaplex token metadata program uses for metadata accounts.
const METADATA_SEED: &[u8] = b"metadata";

/// Parses a base58 encoded address.
pub fn parse_address(value: &str) -> Result<Pubkey, TokenManagerError> {
    Pubkey::from_str(value.trim())
        .map_err(|e| TokenManagerError::InvalidKeyFormat(format!("{value}: {e}")))
}

/// Associated token account holding `owner`'s balance of `mint`.
///
/// Seeds are `[owner, token program, mint]` under the associated token
/// account program.
pub fn derive_associated_token_address(
    owner: &Pubkey,
    mint: &Pubkey,
) -> Result<Pubkey, TokenManagerError> {
    let token_program = spl_token::id();
    Pubkey::try_find_program_address(
        &[owner.as_ref(), token_program.as_ref(), mint.as_ref()],
        &spl_associated_token_account::id(),
    )
    .map(|(address, _bump)| address)
    .ok_or_else(|| {
        TokenManagerError::AddressDerivation(format!(
            "no associated token address for owner {owner} and mint {mint}"
        ))
    })
}

/// Metaplex metadata account of `mint`.
///
/// Seeds are `["metadata", metadata program, mint]` under the metadata program.
pub fn derive_metadata_address(mint: &Pubkey) -> Result<Pubkey, TokenManagerError> {
    let metadata_program = mpl_token_metadata::ID;
    Pubkey::try_find_program_address(
        &[METADATA_SEED, metadata_program.as_ref(), mint.as_ref()],
        &metadata_program,
    )
    .map(|(address, _bump)| address)
    .ok_or_else(|| {
        TokenManagerError::AddressDerivation(format!("no metadata address for mint {mint}"))
    })
}
