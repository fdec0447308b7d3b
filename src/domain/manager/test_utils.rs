use std::{path::PathBuf, sync::Arc, time::Duration};

use solana_sdk::signature::Keypair;
use tempfile::TempDir;

use crate::{
    config::SolanaConfig,
    services::{
        keystore::{FileKeyStore, KeyStoreTrait},
        provider::MockSolanaProviderTrait,
    },
};

use super::TokenManager;

pub type TestTokenManager = TokenManager<MockSolanaProviderTrait, FileKeyStore>;

pub fn test_config() -> SolanaConfig {
    SolanaConfig {
        confirmation_timeout: Duration::from_secs(2),
        submit_attempts: 3,
        ..SolanaConfig::default()
    }
}

/// Manager backed by `provider` and a key store rooted in a fresh temp dir.
/// The dir is returned so it outlives the test.
pub fn create_test_manager(
    provider: MockSolanaProviderTrait,
    config: SolanaConfig,
) -> (TestTokenManager, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let manager = TokenManager::new(Arc::new(provider), Arc::new(FileKeyStore::new()), config);
    (manager, dir)
}

/// Writes a fresh owner key pair into `dir` and returns its path.
pub fn write_owner_key(dir: &TempDir) -> (PathBuf, Keypair) {
    let owner = Keypair::new();
    let path = dir.path().join("owner.json");
    FileKeyStore::new().store(&path, &owner).unwrap();
    (path, owner)
}
