//! # Services Module
//!
//! External collaborators of the token manager: the Solana RPC provider and
//! the key file store.

pub mod keystore;
pub use keystore::*;

pub mod provider;
pub use provider::*;
