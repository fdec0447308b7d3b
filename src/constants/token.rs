//! Constants describing the tokens minted by this tool.

/// Tokens are whole-unit only.
pub const TOKEN_DECIMALS: u8 = 0;

/// The owner is the sole creator and receives the full share.
pub const CREATOR_SHARE: u8 = 100;

/// No secondary-sale royalties are configured.
pub const SELLER_FEE_BASIS_POINTS: u16 = 0;

// Metaplex metadata field limits (bytes)
pub const MAX_TOKEN_NAME_LENGTH: usize = 32;
pub const MAX_TOKEN_SYMBOL_LENGTH: usize = 10;
pub const MAX_TOKEN_URI_LENGTH: usize = 200;

/// Default file the generated mint key pair is written to
pub const DEFAULT_MINT_KEY_FILE: &str = "new_token_key.json";
