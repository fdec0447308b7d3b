//! Key file format compatibility

use solana_sdk::signature::{Keypair, Signer};
use solana_token_manager::{
    models::{KeyFileContent, KeyStoreError},
    services::keystore::{FileKeyStore, KeyStoreTrait},
};

#[test]
fn loads_key_file_written_by_hand() {
    let keypair = Keypair::new();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hand.json");
    let content = serde_json::json!({
        "public_key": keypair.pubkey().to_string(),
        "private_key": bs58::encode(keypair.to_bytes()).into_string(),
    });
    std::fs::write(&path, content.to_string()).unwrap();

    let loaded = FileKeyStore::new().load(&path).unwrap();

    assert_eq!(loaded.pubkey(), keypair.pubkey());
}

#[test]
fn stored_key_file_has_expected_fields() {
    let keypair = Keypair::new();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stored.json");

    FileKeyStore::new().store(&path, &keypair).unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    let content: KeyFileContent = serde_json::from_str(&raw).unwrap();
    assert_eq!(content.public_key, keypair.pubkey().to_string());
    assert_eq!(
        bs58::decode(&content.private_key).into_vec().unwrap(),
        keypair.to_bytes().to_vec()
    );
}

#[test]
fn rejects_key_file_with_wrong_public_key() {
    let keypair = Keypair::new();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mismatch.json");
    let content = serde_json::json!({
        "public_key": Keypair::new().pubkey().to_string(),
        "private_key": bs58::encode(keypair.to_bytes()).into_string(),
    });
    std::fs::write(&path, content.to_string()).unwrap();

    let result = FileKeyStore::new().load(&path);

    assert!(matches!(
        result,
        Err(KeyStoreError::PublicKeyMismatch { .. })
    ));
}
