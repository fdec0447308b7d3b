use serde::Serialize;
use solana_sdk::pubkey::Pubkey;

/// A token account owned by a wallet, as reported by the node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenAccountEntry {
    pub address: Pubkey,
    pub mint: Pubkey,
    pub amount: u64,
}

/// Token holding enriched with its Metaplex metadata, when the mint has any.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OwnedToken {
    pub public_key: String,
    pub mint_public_key: String,
    pub amount: u64,
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub uri: Option<String>,
}

/// Read-only view of an account and the tokens it holds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountSnapshot {
    pub public_key: String,
    pub balance: u64,
    /// False when the node has no record of the account yet.
    pub exists: bool,
    pub is_system: bool,
    pub is_smart_contract: bool,
    pub rent_epoch: u64,
    /// Raw account data, base64 encoded.
    pub data: String,
    pub owned_tokens: Vec<OwnedToken>,
}
