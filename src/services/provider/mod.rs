//! Chain access for the token manager.

mod solana;
pub use solana::*;
