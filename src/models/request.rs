//! Typed inputs for the token manager operations.
//!
//! Each request is built once by the caller and consumed by exactly one
//! operation. Addresses are kept as the caller supplied them and parsed by the
//! operation, so malformed input surfaces as `InvalidKeyFormat`.

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct CreateAccountRequest {
    /// Where the generated key pair is written.
    pub output_key_file: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateTokenRequest {
    pub owner_key_file: PathBuf,
    /// Where the generated mint key pair is written before submission.
    pub mint_key_file: PathBuf,
    pub initial_supply: u64,
    pub name: String,
    pub symbol: String,
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransferNativeRequest {
    pub owner_key_file: PathBuf,
    pub target_address: String,
    pub amount_lamports: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransferTokenRequest {
    pub owner_key_file: PathBuf,
    pub target_address: String,
    pub amount: u64,
    pub token_mint: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AccountInfoRequest {
    pub owner_key_file: PathBuf,
}
