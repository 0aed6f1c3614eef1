use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use argon2::{Algorithm, Argon2, Params, Version};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::RngCore;
use zeroize::{Zeroize, Zeroizing};

const SALT_LEN: usize = 16;
const NONCE_LEN: usize = 12;
const KEY_LEN: usize = 32;
/// Argon2id cost: 19 MiB, two passes, one lane.
const KDF_MEMORY_KIB: u32 = 19 * 1024;
const KDF_PASSES: u32 = 2;
/// Prepended to the plaintext and checked again after decryption.
const MAGIC: &[u8] = b"FEMHEALTH/1";

#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("key derivation failed")]
    KeyDerivation,
    #[error("encryption failed")]
    Encryption,
    #[error("decryption failed: wrong passphrase or corrupted data")]
    Decryption,
    #[error("sealed value is not valid base64")]
    Encoding(#[from] base64::DecodeError),
    #[error("sealed value is truncated")]
    Truncated,
}

fn derive_key(passphrase: &str, salt: &[u8]) -> Result<Zeroizing<[u8; KEY_LEN]>, CryptoError> {
    let params = Params::new(KDF_MEMORY_KIB, KDF_PASSES, 1, Some(KEY_LEN))
        .map_err(|_| CryptoError::KeyDerivation)?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    argon2
        .hash_password_into(passphrase.as_bytes(), salt, &mut key[..])
        .map_err(|_| CryptoError::KeyDerivation)?;
    Ok(key)
}

/// Encrypt `plaintext` under `passphrase` and return a text-safe envelope:
/// base64(salt || nonce || ciphertext).
pub fn seal(passphrase: &str, plaintext: &[u8]) -> Result<String, CryptoError> {
    let mut salt = [0u8; SALT_LEN];
    let mut nonce_bytes = [0u8; NONCE_LEN];
    let mut rng = rand::thread_rng();
    rng.fill_bytes(&mut salt);
    rng.fill_bytes(&mut nonce_bytes);

    let key = derive_key(passphrase, &salt)?;
    let cipher = Aes256Gcm::new_from_slice(&key[..]).map_err(|_| CryptoError::Encryption)?;

    let mut payload = Zeroizing::new(Vec::with_capacity(MAGIC.len() + plaintext.len()));
    payload.extend_from_slice(MAGIC);
    payload.extend_from_slice(plaintext);

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), payload.as_slice())
        .map_err(|_| CryptoError::Encryption)?;

    let mut envelope = Vec::with_capacity(SALT_LEN + NONCE_LEN + ciphertext.len());
    envelope.extend_from_slice(&salt);
    envelope.extend_from_slice(&nonce_bytes);
    envelope.extend_from_slice(&ciphertext);

    Ok(STANDARD.encode(envelope))
}

/// Reverse of [`seal`].
pub fn open(passphrase: &str, sealed: &str) -> Result<Vec<u8>, CryptoError> {
    let envelope = STANDARD.decode(sealed.trim())?;
    if envelope.len() < SALT_LEN + NONCE_LEN + MAGIC.len() {
        return Err(CryptoError::Truncated);
    }

    let (salt, rest) = envelope.split_at(SALT_LEN);
    let (nonce_bytes, ciphertext) = rest.split_at(NONCE_LEN);

    let key = derive_key(passphrase, salt)?;
    let cipher = Aes256Gcm::new_from_slice(&key[..]).map_err(|_| CryptoError::Decryption)?;

    let mut decrypted = cipher
        .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
        .map_err(|_| CryptoError::Decryption)?;

    if !decrypted.starts_with(MAGIC) {
        decrypted.zeroize();
        return Err(CryptoError::Decryption);
    }

    let plaintext = decrypted[MAGIC.len()..].to_vec();
    decrypted.zeroize();
    Ok(plaintext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sealed_text_opens_with_same_passphrase() {
        let sealed = seal("tulip-42", b"{\"week_number\":12}").unwrap();
        assert!(!sealed.contains("week_number"));
        assert_eq!(open("tulip-42", &sealed).unwrap(), b"{\"week_number\":12}");
    }

    #[test]
    fn fresh_salt_every_time() {
        assert_ne!(seal("p", b"same").unwrap(), seal("p", b"same").unwrap());
    }

    #[test]
    fn wrong_passphrase_fails() {
        let sealed = seal("correct", b"secret").unwrap();
        assert!(matches!(open("wrong", &sealed), Err(CryptoError::Decryption)));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(open("any", "not base64!"), Err(CryptoError::Encoding(_))));
        assert!(matches!(open("any", &STANDARD.encode([0u8; 10])), Err(CryptoError::Truncated)));
    }
}
