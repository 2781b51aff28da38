use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

const NONCE_LEN: usize = 12;

/// AES-256-GCM sealing for secrets kept in the settings store.
pub struct SecretBox {
    cipher: Aes256Gcm,
}

impl SecretBox {
    /// Create from a base64-encoded 32-byte key.
    pub fn new(key_base64: &str) -> Result<Self, EncryptionError> {
        let key_bytes = STANDARD
            .decode(key_base64.trim())
            .map_err(|_| EncryptionError::InvalidKey)?;

        if key_bytes.len() != 32 {
            return Err(EncryptionError::InvalidKey);
        }

        let cipher =
            Aes256Gcm::new_from_slice(&key_bytes).map_err(|_| EncryptionError::InvalidKey)?;

        Ok(Self { cipher })
    }

    /// Seal a secret, returning base64 of the nonce followed by the ciphertext.
    pub fn seal(&self, plaintext: &str) -> Result<String, EncryptionError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|_| EncryptionError::EncryptFailed)?;

        let mut output = nonce.to_vec();
        output.extend(ciphertext);
        Ok(STANDARD.encode(output))
    }

    /// Open a value produced by [`SecretBox::seal`].
    pub fn open(&self, sealed: &str) -> Result<String, EncryptionError> {
        let data = STANDARD
            .decode(sealed)
            .map_err(|_| EncryptionError::DecryptFailed)?;
        if data.len() < NONCE_LEN {
            return Err(EncryptionError::DecryptFailed);
        }

        let (nonce_bytes, ciphertext) = data.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
            .map_err(|_| EncryptionError::DecryptFailed)?;

        String::from_utf8(plaintext).map_err(|_| EncryptionError::DecryptFailed)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EncryptionError {
    #[error("Invalid encryption key (must be 32 bytes, base64-encoded)")]
    InvalidKey,

    #[error("Encryption failed")]
    EncryptFailed,

    #[error("Decryption failed")]
    DecryptFailed,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_key() -> String {
        STANDARD.encode([7u8; 32])
    }

    #[test]
    fn sealed_secret_opens_to_the_original() {
        let secrets = SecretBox::new(&test_key()).unwrap();
        let sealed = secrets.seal("sk-test-123").unwrap();

        assert!(!sealed.contains("sk-test-123"));
        assert_eq!(secrets.open(&sealed).unwrap(), "sk-test-123");
    }

    #[test]
    fn sealing_twice_uses_fresh_nonces() {
        let secrets = SecretBox::new(&test_key()).unwrap();
        assert_ne!(secrets.seal("same").unwrap(), secrets.seal("same").unwrap());
    }

    #[test]
    fn short_keys_are_rejected() {
        let key = STANDARD.encode([1u8; 16]);
        assert!(matches!(SecretBox::new(&key), Err(EncryptionError::InvalidKey)));
    }

    #[test]
    fn tampered_values_fail_to_open() {
        let secrets = SecretBox::new(&test_key()).unwrap();
        let mut raw = STANDARD.decode(secrets.seal("sk-test").unwrap()).unwrap();
        let last = raw.len() - 1;
        raw[last] ^= 0xff;

        assert!(matches!(
            secrets.open(&STANDARD.encode(raw)),
            Err(EncryptionError::DecryptFailed)
        ));
    }
}
