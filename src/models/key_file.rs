use serde::{Deserialize, Serialize};

/// On-disk key file layout. Both fields are base58 encoded; the private key
/// holds the full 64-byte secret.
#[derive(Serialize, Deserialize, Clone, PartialEq)]
pub struct KeyFileContent {
    #[serde(default)]
    pub public_key: String,
    pub private_key: String,
}

impl std::fmt::Debug for KeyFileContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyFileContent")
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .finish()
    }
}
