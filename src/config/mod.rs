mod solana_config;
pub use solana_config::*;
