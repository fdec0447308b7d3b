//! Key file storage.
//!
//! Key pairs are persisted as pretty-printed JSON holding the base58 public key
//! and the base58 encoding of the full 64-byte secret. Files are created with
//! owner-only permissions on Unix.
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::Path,
};

#[cfg(test)]
use mockall::automock;
use solana_sdk::signature::{Keypair, Signer};
use tracing::debug;
use zeroize::{Zeroize, Zeroizing};

use crate::models::{KeyFileContent, KeyStoreError};

#[cfg_attr(test, automock)]
pub trait KeyStoreTrait: Send + Sync {
    /// Loads the key pair stored at `path`.
    fn load(&self, path: &Path) -> Result<Keypair, KeyStoreError>;

    /// Writes `keypair` to `path`, replacing any existing file.
    fn store(&self, path: &Path, keypair: &Keypair) -> Result<(), KeyStoreError>;
}

#[derive(Debug, Clone, Default)]
pub struct FileKeyStore;

impl FileKeyStore {
    pub fn new() -> Self {
        Self
    }

    fn decode_keypair(path: &Path, content: &KeyFileContent) -> Result<Keypair, KeyStoreError> {
        let parse_error = |reason: String| KeyStoreError::Parse {
            path: path.display().to_string(),
            reason,
        };

        let secret = Zeroizing::new(
            bs58::decode(content.private_key.trim())
                .into_vec()
                .map_err(|e| parse_error(format!("private key is not base58: {e}")))?,
        );
        if secret.len() != 64 {
            return Err(parse_error(format!(
                "private key must be 64 bytes, got {}",
                secret.len()
            )));
        }

        let keypair = Keypair::try_from(&secret[..])
            .map_err(|e| parse_error(format!("invalid private key: {e}")))?;

        let expected = content.public_key.trim();
        let derived = keypair.pubkey().to_string();
        if !expected.is_empty() && expected != derived {
            return Err(KeyStoreError::PublicKeyMismatch {
                path: path.display().to_string(),
                expected: expected.to_string(),
                derived,
            });
        }

        Ok(keypair)
    }
}

impl KeyStoreTrait for FileKeyStore {
    fn load(&self, path: &Path) -> Result<Keypair, KeyStoreError> {
        let raw = Zeroizing::new(fs::read_to_string(path).map_err(|e| KeyStoreError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?);

        let mut content: KeyFileContent =
            serde_json::from_str(&raw).map_err(|e| KeyStoreError::Parse {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        let keypair = Self::decode_keypair(path, &content);
        content.private_key.zeroize();
        let keypair = keypair?;

        debug!(path = %path.display(), public_key = %keypair.pubkey(), "loaded key file");
        Ok(keypair)
    }

    fn store(&self, path: &Path, keypair: &Keypair) -> Result<(), KeyStoreError> {
        let write_error = |reason: String| KeyStoreError::Write {
            path: path.display().to_string(),
            reason,
        };

        let mut content = KeyFileContent {
            public_key: keypair.pubkey().to_string(),
            private_key: keypair.to_base58_string(),
        };
        let serialized = serde_json::to_string_pretty(&content).map(Zeroizing::new);
        content.private_key.zeroize();
        let serialized = serialized.map_err(|e| write_error(e.to_string()))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| write_error(e.to_string()))?;
        }

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(path).map_err(|e| write_error(e.to_string()))?;
        file.write_all(serialized.as_bytes())
            .map_err(|e| write_error(e.to_string()))?;

        debug!(path = %path.display(), public_key = %keypair.pubkey(), "stored key file");
        Ok(())
    }
}
