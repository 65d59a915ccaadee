//! Credential decryption seam.

use herald_error::PublishError;

/// Decrypts access tokens stored at rest.
///
/// Plaintext tokens live only in memory, immediately before a publish call.
pub trait TokenCipher: Send + Sync {
    /// Decrypt a stored token.
    fn decrypt(&self, encrypted: &str) -> Result<String, PublishError>;

    /// Encrypt a token for storage.
    fn encrypt(&self, plaintext: &str) -> String;
}
