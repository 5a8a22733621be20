//! Credential encryption at rest.
//!
//! Secret values are sealed with AES-256-GCM under a process-local key.
//! The key is generated once and persisted next to the database with
//! owner-only permissions; losing the key file invalidates stored secrets.

use std::path::Path;

use aes_gcm::aead::{Aead, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Key, KeyInit, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::error::{StoreError, StoreResult};

/// Length of the AES-GCM nonce prepended to every ciphertext.
const NONCE_LEN: usize = 12;

/// AES-256-GCM cipher for credential values.
#[derive(Clone)]
pub struct SecretCipher {
    cipher: Aes256Gcm,
}

impl SecretCipher {
    /// Build a cipher from a raw 32-byte key.
    pub fn from_key(key: &[u8]) -> StoreResult<Self> {
        if key.len() != 32 {
            return Err(StoreError::crypto(format!(
                "encryption key must be 32 bytes, got {}",
                key.len()
            )));
        }
        Ok(Self {
            cipher: Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key)),
        })
    }

    /// Load the key from `key_path`, generating and persisting a fresh one
    /// on first use. The key file is written with 0600 permissions.
    pub fn load_or_generate(key_path: impl AsRef<Path>) -> StoreResult<Self> {
        let key_path = key_path.as_ref();

        if key_path.exists() {
            let key = std::fs::read(key_path)?;
            return Self::from_key(&key);
        }

        if let Some(parent) = key_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let key = Aes256Gcm::generate_key(&mut OsRng);
        std::fs::write(key_path, key.as_slice())?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(key_path, std::fs::Permissions::from_mode(0o600))?;
        }

        Self::from_key(key.as_slice())
    }

    /// Encrypt a secret value. Output is base64(nonce || ciphertext).
    pub fn encrypt(&self, plaintext: &str) -> StoreResult<String> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|e| StoreError::crypto(format!("encrypt failed: {e}")))?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        sealed.extend_from_slice(&nonce);
        sealed.extend_from_slice(&ciphertext);
        Ok(BASE64.encode(sealed))
    }

    /// Decrypt a value previously produced by [`encrypt`](Self::encrypt).
    pub fn decrypt(&self, sealed: &str) -> StoreResult<String> {
        let sealed = BASE64
            .decode(sealed)
            .map_err(|e| StoreError::crypto(format!("invalid ciphertext encoding: {e}")))?;

        if sealed.len() <= NONCE_LEN {
            return Err(StoreError::crypto("ciphertext too short"));
        }

        let (nonce, ciphertext) = sealed.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|e| StoreError::crypto(format!("decrypt failed: {e}")))?;

        String::from_utf8(plaintext)
            .map_err(|e| StoreError::crypto(format!("decrypted value is not UTF-8: {e}")))
    }
}
