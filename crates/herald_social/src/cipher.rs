//! Fernet decryption of stored access tokens.

use herald_error::{ConfigError, PublishError, PublishErrorKind};
use herald_interface::TokenCipher;

/// Environment variable holding the url-safe base64 Fernet key.
pub const ENCRYPTION_KEY_VAR: &str = "ENCRYPTION_KEY";

/// [`TokenCipher`] backed by a Fernet key.
pub struct FernetCipher {
    fernet: fernet::Fernet,
}

impl std::fmt::Debug for FernetCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FernetCipher")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

impl FernetCipher {
    /// Create a cipher from a url-safe base64 32-byte key.
    pub fn new(key: &str) -> Result<Self, ConfigError> {
        fernet::Fernet::new(key.trim())
            .map(|fernet| Self { fernet })
            .ok_or_else(|| ConfigError::invalid_env(ENCRYPTION_KEY_VAR, "is not a valid Fernet key"))
    }

    /// Create a cipher from `ENCRYPTION_KEY`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let key = std::env::var(ENCRYPTION_KEY_VAR)
            .map_err(|_| ConfigError::missing_env(ENCRYPTION_KEY_VAR))?;
        Self::new(&key)
    }

    /// Generate a fresh key, for provisioning.
    pub fn generate_key() -> String {
        fernet::Fernet::generate_key()
    }
}

impl TokenCipher for FernetCipher {
    fn decrypt(&self, encrypted: &str) -> Result<String, PublishError> {
        let bytes = self.fernet.decrypt(encrypted.trim()).map_err(|_| {
            PublishError::new(PublishErrorKind::Decrypt(
                "token is not valid for the configured key".to_string(),
            ))
        })?;
        String::from_utf8(bytes)
            .map_err(|_| PublishError::new(PublishErrorKind::Decrypt("token is not UTF-8".to_string())))
    }

    fn encrypt(&self, plaintext: &str) -> String {
        self.fernet.encrypt(plaintext.as_bytes())
    }
}
