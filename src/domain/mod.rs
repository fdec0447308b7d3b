//! # Domain Module
//!
//! Core token management logic:
//!
//! * Address derivation for associated token and metadata accounts
//! * Instruction list construction
//! * Transaction lifecycle tracking and confirmation polling
//! * The `TokenManager` that ties them to a provider and a key store

pub mod address;
pub mod confirmation;
pub mod instructions;
pub mod lifecycle;

mod manager;
pub use manager::*;
