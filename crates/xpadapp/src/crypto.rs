//! # Encryption Envelope
//!
//! Encrypted note bodies are stored as a single binary blob:
//!
//! ```text
//! ┌──────────┬──────────┬──────────────┬──────────────────┐
//! │ salt(16) │  iv(16)  │ auth tag(16) │ ciphertext(rest) │
//! └──────────┴──────────┴──────────────┴──────────────────┘
//! ```
//!
//! The key is derived per envelope with Argon2id from the password and the
//! stored salt; the body is sealed with AES-256-GCM using a 16-byte nonce.
//! Decryption verifies the tag before any plaintext is returned and maps
//! every failure to [`XpadError::Authentication`].

use crate::error::{Result, XpadError};
use aes_gcm::aead::consts::U16;
use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::{AeadInPlace, KeyInit};
use aes_gcm::aes::Aes256;
use aes_gcm::AesGcm;
use argon2::Argon2;
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

pub const SALT_LEN: usize = 16;
pub const IV_LEN: usize = 16;
pub const TAG_LEN: usize = 16;
pub const KEY_LEN: usize = 32;
pub const HEADER_LEN: usize = SALT_LEN + IV_LEN + TAG_LEN;

type Cipher = AesGcm<Aes256, U16>;

fn derive_key(password: &str, salt: &[u8]) -> Result<Zeroizing<[u8; KEY_LEN]>> {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    Argon2::default()
        .hash_password_into(password.as_bytes(), salt, &mut key[..])
        .map_err(|_| XpadError::Encryption)?;
    Ok(key)
}

fn cipher_for(key: &[u8; KEY_LEN]) -> Result<Cipher> {
    Cipher::new_from_slice(key).map_err(|_| XpadError::Encryption)
}

/// Seals `plaintext` into a `salt ‖ iv ‖ tag ‖ ciphertext` envelope.
pub fn encrypt(plaintext: &str, password: &str) -> Result<Vec<u8>> {
    let mut salt = [0u8; SALT_LEN];
    let mut iv = [0u8; IV_LEN];
    OsRng.fill_bytes(&mut salt);
    OsRng.fill_bytes(&mut iv);

    let key = derive_key(password, &salt)?;
    let cipher = cipher_for(&key)?;

    let mut buffer = plaintext.as_bytes().to_vec();
    let tag = cipher
        .encrypt_in_place_detached(GenericArray::from_slice(&iv), b"", buffer.as_mut_slice())
        .map_err(|_| XpadError::Encryption)?;

    let mut out = Vec::with_capacity(HEADER_LEN + buffer.len());
    out.extend_from_slice(&salt);
    out.extend_from_slice(&iv);
    out.extend_from_slice(tag.as_slice());
    out.extend_from_slice(&buffer);
    Ok(out)
}

/// Opens an envelope produced by [`encrypt`].
///
/// Wrong passwords, truncated or tampered envelopes and non-UTF-8 plaintext
/// all fail with [`XpadError::Authentication`].
pub fn decrypt(envelope: &[u8], password: &str) -> Result<String> {
    if envelope.len() < HEADER_LEN {
        return Err(XpadError::Authentication);
    }
    let (salt, rest) = envelope.split_at(SALT_LEN);
    let (iv, rest) = rest.split_at(IV_LEN);
    let (tag, ciphertext) = rest.split_at(TAG_LEN);

    let key = derive_key(password, salt).map_err(|_| XpadError::Authentication)?;
    let cipher = cipher_for(&key).map_err(|_| XpadError::Authentication)?;

    let mut buffer = Zeroizing::new(ciphertext.to_vec());
    cipher
        .decrypt_in_place_detached(
            GenericArray::from_slice(iv),
            b"",
            buffer.as_mut_slice(),
            GenericArray::from_slice(tag),
        )
        .map_err(|_| XpadError::Authentication)?;

    String::from_utf8(buffer.to_vec()).map_err(|_| XpadError::Authentication)
}

/// Cheap structural check; it does not authenticate anything.
pub fn looks_encrypted(data: &[u8]) -> bool {
    data.len() >= HEADER_LEN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_restores_plaintext() {
        let sealed = encrypt("buy milk\nand eggs ✓", "hunter2").unwrap();
        assert_eq!(decrypt(&sealed, "hunter2").unwrap(), "buy milk\nand eggs ✓");
    }

    #[test]
    fn envelope_layout_has_header_and_ciphertext() {
        let sealed = encrypt("abc", "pw").unwrap();
        assert_eq!(sealed.len(), HEADER_LEN + 3);
        assert!(looks_encrypted(&sealed));
    }

    #[test]
    fn empty_plaintext_still_carries_a_tag() {
        let sealed = encrypt("", "pw").unwrap();
        assert_eq!(sealed.len(), HEADER_LEN);
        assert_eq!(decrypt(&sealed, "pw").unwrap(), "");
    }

    #[test]
    fn wrong_password_fails_closed() {
        let sealed = encrypt("secret", "right").unwrap();
        assert!(matches!(
            decrypt(&sealed, "wrong"),
            Err(XpadError::Authentication)
        ));
    }

    #[test]
    fn fresh_salt_and_iv_per_call() {
        let a = encrypt("same", "pw").unwrap();
        let b = encrypt("same", "pw").unwrap();
        assert_ne!(a[..SALT_LEN + IV_LEN], b[..SALT_LEN + IV_LEN]);
    }

    #[test]
    fn truncated_envelope_is_rejected() {
        let sealed = encrypt("secret", "pw").unwrap();
        assert!(matches!(
            decrypt(&sealed[..HEADER_LEN - 1], "pw"),
            Err(XpadError::Authentication)
        ));
        assert!(matches!(
            decrypt(&sealed[..sealed.len() - 1], "pw"),
            Err(XpadError::Authentication)
        ));
    }

    #[test]
    fn tampered_ciphertext_is_rejected() {
        let mut sealed = encrypt("secret", "pw").unwrap();
        let last = sealed.len() - 1;
        sealed[last] ^= 0x01;
        assert!(matches!(decrypt(&sealed, "pw"), Err(XpadError::Authentication)));
    }
}
