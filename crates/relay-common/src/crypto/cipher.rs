//! Symmetric encryption for message content at rest.
//!
//! Message bodies are encrypted with AES-256-GCM before being persisted and
//! decrypted only at delivery time.
//!
//! Wire format per encrypted message:
//! ```text
//! hex(nonce) ":" hex(ciphertext + 16-byte GCM tag)
//! ```

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};

/// Nonce size for AES-256-GCM
const NONCE_LEN: usize = 12;

/// Encryption errors
#[derive(Debug, thiserror::Error)]
pub enum CipherError {
    #[error("Encryption key must be 64 hex characters")]
    InvalidKey,

    #[error("Malformed ciphertext payload")]
    MalformedPayload,

    #[error("Encryption failed")]
    EncryptFailed,

    #[error("Decryption failed")]
    DecryptFailed,
}

/// Stateless cipher for message content.
#[derive(Clone)]
pub struct MessageCipher {
    key: [u8; 32],
}

impl MessageCipher {
    /// Create a cipher from a 64-hex-character secret.
    ///
    /// # Errors
    /// Returns an error if the secret does not decode to exactly 32 bytes
    pub fn from_hex_secret(secret: &str) -> Result<Self, CipherError> {
        let bytes = hex::decode(secret).map_err(|_| CipherError::InvalidKey)?;
        let key: [u8; 32] = bytes.try_into().map_err(|_| CipherError::InvalidKey)?;
        Ok(Self { key })
    }

    /// Encrypt a plaintext message body.
    ///
    /// # Errors
    /// Returns an error if encryption fails
    pub fn encrypt(&self, plaintext: &str) -> Result<String, CipherError> {
        let key = Key::<Aes256Gcm>::from_slice(&self.key);
        let cipher = Aes256Gcm::new(key);

        let nonce_bytes: [u8; NONCE_LEN] = rand::random();
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|_| CipherError::EncryptFailed)?;

        Ok(format!("{}:{}", hex::encode(nonce_bytes), hex::encode(ciphertext)))
    }

    /// Decrypt a payload produced by [`encrypt`](Self::encrypt).
    ///
    /// # Errors
    /// Returns an error if the payload is malformed or fails authentication
    pub fn decrypt(&self, payload: &str) -> Result<String, CipherError> {
        let (nonce_hex, ct_hex) = payload
            .split_once(':')
            .ok_or(CipherError::MalformedPayload)?;

        let nonce_bytes = hex::decode(nonce_hex).map_err(|_| CipherError::MalformedPayload)?;
        if nonce_bytes.len() != NONCE_LEN {
            return Err(CipherError::MalformedPayload);
        }
        let ciphertext = hex::decode(ct_hex).map_err(|_| CipherError::MalformedPayload)?;

        let key = Key::<Aes256Gcm>::from_slice(&self.key);
        let cipher = Aes256Gcm::new(key);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let plaintext = cipher
            .decrypt(nonce, ciphertext.as_slice())
            .map_err(|_| CipherError::DecryptFailed)?;

        String::from_utf8(plaintext).map_err(|_| CipherError::DecryptFailed)
    }
}

impl std::fmt::Debug for MessageCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageCipher").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_cipher() -> MessageCipher {
        let secret = "a".repeat(64);
        MessageCipher::from_hex_secret(&secret).unwrap()
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let cipher = test_cipher();
        let encrypted = cipher.encrypt("Hello, this is a secret message!").unwrap();

        assert!(encrypted.contains(':'));
        assert_ne!(encrypted, "Hello, this is a secret message!");

        let decrypted = cipher.decrypt(&encrypted).unwrap();
        assert_eq!(decrypted, "Hello, this is a secret message!");
    }

    #[test]
    fn test_unique_nonces() {
        let cipher = test_cipher();
        let a = cipher.encrypt("same plaintext").unwrap();
        let b = cipher.encrypt("same plaintext").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_wrong_key_fails() {
        let cipher = test_cipher();
        let other = MessageCipher::from_hex_secret(&"b".repeat(64)).unwrap();

        let encrypted = cipher.encrypt("secret").unwrap();
        assert!(matches!(other.decrypt(&encrypted), Err(CipherError::DecryptFailed)));
    }

    #[test]
    fn test_invalid_key_length() {
        assert!(matches!(
            MessageCipher::from_hex_secret("deadbeef"),
            Err(CipherError::InvalidKey)
        ));
        assert!(matches!(
            MessageCipher::from_hex_secret("not hex at all"),
            Err(CipherError::InvalidKey)
        ));
    }

    #[test]
    fn test_malformed_payload() {
        let cipher = test_cipher();
        assert!(matches!(
            cipher.decrypt("no-separator"),
            Err(CipherError::MalformedPayload)
        ));
        assert!(matches!(
            cipher.decrypt("zzzz:1234"),
            Err(CipherError::MalformedPayload)
        ));
    }
}
