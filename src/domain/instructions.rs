//! Instruction list construction.
//!
//! Pure functions: every address is resolved by the caller and nothing here
//! touches the network. The order of the returned instructions is the order
//! they execute in.
use mpl_token_metadata::{
    instructions::CreateMetadataAccountV3Builder,
    types::{Creator, DataV2},
};
use solana_sdk::{instruction::Instruction, program_pack::Pack, pubkey::Pubkey};
use solana_system_interface::instruction as system_instruction;
use spl_associated_token_account::instruction::{
    create_associated_token_account, create_associated_token_account_idempotent,
};

use crate::{
    constants::{
        CREATOR_SHARE, MAX_TOKEN_NAME_LENGTH, MAX_TOKEN_SYMBOL_LENGTH, MAX_TOKEN_URI_LENGTH,
        SELLER_FEE_BASIS_POINTS, TOKEN_DECIMALS,
    },
    models::TokenManagerError,
};

/// Resolved inputs for minting a new token with metadata.
#[derive(Debug, Clone)]
pub struct CreateTokenInstructionParams<'a> {
    pub owner: Pubkey,
    pub mint: Pubkey,
    /// Owner's associated token account for `mint`.
    pub associated_account: Pubkey,
    pub metadata_account: Pubkey,
    /// Rent-exempt balance for a mint account.
    pub mint_rent_lamports: u64,
    pub initial_supply: u64,
    pub name: &'a str,
    pub symbol: &'a str,
    pub uri: &'a str,
}

/// Resolved inputs for an SPL token transfer.
#[derive(Debug, Clone)]
pub struct TransferTokenInstructionParams {
    pub owner: Pubkey,
    pub recipient: Pubkey,
    pub mint: Pubkey,
    pub source_account: Pubkey,
    pub destination_account: Pubkey,
    pub amount: u64,
    pub destination_exists: bool,
}

/// Rejects metadata the metadata program would refuse.
pub fn validate_token_metadata(
    name: &str,
    symbol: &str,
    uri: &str,
) -> Result<(), TokenManagerError> {
    let checks = [
        ("name", name, MAX_TOKEN_NAME_LENGTH),
        ("symbol", symbol, MAX_TOKEN_SYMBOL_LENGTH),
        ("uri", uri, MAX_TOKEN_URI_LENGTH),
    ];

    for (field, value, limit) in checks {
        if value.len() > limit {
            return Err(TokenManagerError::InvalidRequest(format!(
                "token {field} is {} bytes, limit is {limit}",
                value.len()
            )));
        }
    }

    if name.trim().is_empty() {
        return Err(TokenManagerError::InvalidRequest(
            "token name must not be empty".to_string(),
        ));
    }

    Ok(())
}

fn sole_creator(owner: Pubkey) -> Result<Vec<Creator>, TokenManagerError> {
    let creators = vec![Creator {
        address: owner,
        verified: true,
        share: CREATOR_SHARE,
    }];

    let total: u16 = creators.iter().map(|c| u16::from(c.share)).sum();
    if total != 100 {
        return Err(TokenManagerError::InvalidRequest(format!(
            "creator shares must sum to 100, got {total}"
        )));
    }

    Ok(creators)
}

/// Builds the five instructions that mint a new token with metadata:
///
/// 1. allocate the mint account, funded for rent exemption and owned by the token program
/// 2. initialize the mint with zero decimals and the owner as mint authority
/// 3. create the owner's associated token account if it does not exist
/// 4. mint the initial supply into that account
/// 5. attach Metaplex metadata with the owner as sole verified creator and update authority
pub fn build_create_token_instructions(
    params: &CreateTokenInstructionParams<'_>,
) -> Result<Vec<Instruction>, TokenManagerError> {
    validate_token_metadata(params.name, params.symbol, params.uri)?;
    let token_program = spl_token::id();

    let create_mint_account = system_instruction::create_account(
        &params.owner,
        &params.mint,
        params.mint_rent_lamports,
        spl_token::state::Mint::LEN as u64,
        &token_program,
    );

    let initialize_mint = spl_token::instruction::initialize_mint(
        &token_program,
        &params.mint,
        &params.owner,
        None,
        TOKEN_DECIMALS,
    )
    .map_err(|e| TokenManagerError::InvalidRequest(format!("initialize mint: {e}")))?;

    let create_associated_account = create_associated_token_account_idempotent(
        &params.owner,
        &params.owner,
        &params.mint,
        &token_program,
    );

    let mint_to = spl_token::instruction::mint_to(
        &token_program,
        &params.mint,
        &params.associated_account,
        &params.owner,
        &[],
        params.initial_supply,
    )
    .map_err(|e| TokenManagerError::InvalidRequest(format!("mint to: {e}")))?;

    let create_metadata = CreateMetadataAccountV3Builder::new()
        .metadata(params.metadata_account)
        .mint(params.mint)
        .mint_authority(params.owner)
        .payer(params.owner)
        .update_authority(params.owner, true)
        .data(DataV2 {
            name: params.name.to_string(),
            symbol: params.symbol.to_string(),
            uri: params.uri.to_string(),
            seller_fee_basis_points: SELLER_FEE_BASIS_POINTS,
            creators: Some(sole_creator(params.owner)?),
            collection: None,
            uses: None,
        })
        .is_mutable(true)
        .instruction();

    Ok(vec![
        create_mint_account,
        initialize_mint,
        create_associated_account,
        mint_to,
        create_metadata,
    ])
}

/// Builds a single native transfer of `lamports` from `from` to `to`.
pub fn build_transfer_sol_instructions(
    from: &Pubkey,
    to: &Pubkey,
    lamports: u64,
) -> Vec<Instruction> {
    vec![system_instruction::transfer(from, to, lamports)]
}

/// Builds an SPL transfer between associated token accounts, prefixed with
/// the creation of the recipient's account when it does not exist yet.
pub fn build_transfer_token_instructions(
    params: &TransferTokenInstructionParams,
) -> Result<Vec<Instruction>, TokenManagerError> {
    let token_program = spl_token::id();
    let mut instructions = Vec::with_capacity(2);

    if !params.destination_exists {
        instructions.push(create_associated_token_account(
            &params.owner,
            &params.recipient,
            &params.mint,
            &token_program,
        ));
    }

    instructions.push(
        spl_token::instruction::transfer(
            &token_program,
            &params.source_account,
            &params.destination_account,
            &params.owner,
            &[],
            params.amount,
        )
        .map_err(|e| TokenManagerError::InvalidRequest(format!("token transfer: {e}")))?,
    );

    Ok(instructions)
}
