//! Solana token management.
//!
//! Creates accounts and tokens, inspects accounts and moves SOL and SPL
//! tokens, with key pairs kept in local JSON files.

pub mod cli;
pub mod config;
pub mod constants;
pub mod domain;
pub mod logging;
pub mod models;
pub mod services;
pub mod utils;
