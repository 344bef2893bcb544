use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use thiserror::Error;

const NONCE_SIZE: usize = 12; // AES-GCM standard nonce size

#[derive(Error, Debug, PartialEq, Eq)]
pub enum EncryptionError {
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),
    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),
    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

/// AES-256-GCM for broker passwords at rest. Ciphertexts are hex strings with
/// the 12-byte nonce prepended.
pub struct EncryptionService {
    cipher: Aes256Gcm,
}

impl EncryptionService {
    pub fn new(key: &[u8]) -> Result<Self, EncryptionError> {
        let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| {
            EncryptionError::InvalidKey("key must be 32 bytes (256 bits) long".to_string())
        })?;
        Ok(Self { cipher })
    }

    pub fn from_hex(key_hex: &str) -> Result<Self, EncryptionError> {
        let key_bytes = hex::decode(key_hex)
            .map_err(|e| EncryptionError::InvalidKey(format!("invalid hex key: {e}")))?;
        Self::new(&key_bytes)
    }

    pub fn encrypt(&self, plain_text: &str) -> Result<String, EncryptionError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, plain_text.as_bytes())
            .map_err(|e| EncryptionError::EncryptionFailed(e.to_string()))?;

        let mut result = nonce.to_vec();
        result.extend_from_slice(&ciphertext);
        Ok(hex::encode(result))
    }

    pub fn decrypt(&self, cipher_hex: &str) -> Result<String, EncryptionError> {
        let encrypted_data = hex::decode(cipher_hex)
            .map_err(|e| EncryptionError::DecryptionFailed(format!("invalid hex ciphertext: {e}")))?;
        if encrypted_data.len() < NONCE_SIZE {
            return Err(EncryptionError::DecryptionFailed(
                "ciphertext is too short to contain a nonce".to_string(),
            ));
        }

        let (nonce_bytes, ciphertext) = encrypted_data.split_at(NONCE_SIZE);
        let nonce = Nonce::from_slice(nonce_bytes);

        let decrypted_bytes = self
            .cipher
            .decrypt(nonce, ciphertext)
            .map_err(|e| EncryptionError::DecryptionFailed(e.to_string()))?;

        String::from_utf8(decrypted_bytes)
            .map_err(|e| EncryptionError::DecryptionFailed(format!("invalid UTF-8 sequence: {e}")))
    }
}
