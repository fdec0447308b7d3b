/// Mainnet endpoint used when no `SOLANA_API_URL` is set
pub const DEFAULT_SOLANA_API_URL: &str = "https://api.mainnet-beta.solana.com";

/// Sandbox endpoint used when no `SOLANA_API_SANDBOX_URL` is set
pub const DEFAULT_SOLANA_SANDBOX_API_URL: &str = "https://api.devnet.solana.com";

/// Lamports requested from the sandbox faucet for every new account (2 SOL)
pub const SANDBOX_AIRDROP_LAMPORTS: u64 = 2_000_000_000;
