//!
//! # Secret value encryption
//!
//! Secrets are stored in the sync repository with every `data` value
//! encrypted. Output must be identical for identical key and plaintext,
//! otherwise every sync pass would produce a new commit, so the default
//! cipher has no nonce.
//!
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::Value;
use sha2::{Digest, Sha256};

use k8_spec_types::ResourceObject;

use crate::SpecError;

pub trait SecretCipher {
    fn encrypt_value(&self, plaintext: &str, key: &str) -> Result<String, SpecError>;

    fn decrypt_value(&self, ciphertext: &str, key: &str) -> Result<String, SpecError>;

    /// copy of the secret with every data value encrypted
    fn encrypt(&self, secret: &ResourceObject, key: &str) -> Result<ResourceObject, SpecError> {
        transform_data(secret, |value| self.encrypt_value(value, key))
    }

    /// copy of the secret with every data value decrypted
    fn decrypt(&self, secret: &ResourceObject, key: &str) -> Result<ResourceObject, SpecError> {
        transform_data(secret, |value| self.decrypt_value(value, key))
    }
}

fn transform_data<F>(secret: &ResourceObject, mut transform: F) -> Result<ResourceObject, SpecError>
where
    F: FnMut(&str) -> Result<String, SpecError>,
{
    let mut output = secret.clone();
    if let Some(data) = output.data_mut() {
        for (key, value) in data.iter_mut() {
            let plain = value.as_str().ok_or_else(|| {
                SpecError::Secret(format!("value of data key {} is not a string", key))
            })?;
            *value = Value::String(transform(plain)?);
        }
    }
    Ok(output)
}

/// XOR with a SHA-256 counter keystream derived from the key, base64 encoded.
///
/// Deterministic and unauthenticated: this hides values from casual readers
/// of the repository, it does not protect against tampering.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeystreamCipher;

impl KeystreamCipher {
    fn apply(&self, input: &[u8], key: &str) -> Vec<u8> {
        input
            .chunks(32)
            .enumerate()
            .flat_map(|(counter, chunk)| {
                let mut hasher = Sha256::new();
                hasher.update(key.as_bytes());
                hasher.update((counter as u64).to_be_bytes());
                let block = hasher.finalize();
                chunk
                    .iter()
                    .zip(block)
                    .map(|(byte, pad)| byte ^ pad)
                    .collect::<Vec<u8>>()
            })
            .collect()
    }
}

impl SecretCipher for KeystreamCipher {
    fn encrypt_value(&self, plaintext: &str, key: &str) -> Result<String, SpecError> {
        Ok(STANDARD.encode(self.apply(plaintext.as_bytes(), key)))
    }

    fn decrypt_value(&self, ciphertext: &str, key: &str) -> Result<String, SpecError> {
        let encrypted = STANDARD
            .decode(ciphertext)
            .map_err(|err| SpecError::Secret(format!("invalid base64: {}", err)))?;
        String::from_utf8(self.apply(&encrypted, key))
            .map_err(|_| SpecError::Secret("decrypted value is not utf-8, wrong key?".to_owned()))
    }
}
