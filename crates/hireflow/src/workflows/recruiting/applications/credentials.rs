//! Password generation and hashing for accounts created on the anonymous path.
//!
//! Uses argon2id with default parameters; only the PHC hash string ever leaves this module
//! towards storage.

use argon2::{
    password_hash::{
        rand_core::OsRng as SaltRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    },
    Argon2,
};
use rand::rngs::OsRng;
use rand::seq::SliceRandom;

pub const GENERATED_PASSWORD_LENGTH: usize = 16;

const LOWERCASE: &[u8] = b"abcdefghijkmnopqrstuvwxyz";
const UPPERCASE: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ";
const DIGITS: &[u8] = b"23456789";
const SYMBOLS: &[u8] = b"!@#$%^&*-_=+?";

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("failed to hash password: {0}")]
    Hash(String),
    #[error("invalid password hash format: {0}")]
    InvalidHash(String),
}

/// Random password with at least one character from every class, shuffled.
pub fn generate_password() -> String {
    let mut rng = OsRng;
    let classes = [LOWERCASE, UPPERCASE, DIGITS, SYMBOLS];
    let alphabet: Vec<u8> = classes.concat();

    let mut bytes: Vec<u8> = classes
        .iter()
        .filter_map(|class| class.choose(&mut rng).copied())
        .collect();
    while bytes.len() < GENERATED_PASSWORD_LENGTH {
        if let Some(byte) = alphabet.choose(&mut rng) {
            bytes.push(*byte);
        }
    }
    bytes.shuffle(&mut rng);

    bytes.into_iter().map(char::from).collect()
}

pub fn hash_password(password: &str) -> Result<String, CredentialError> {
    let salt = SaltString::generate(&mut SaltRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| CredentialError::Hash(err.to_string()))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, CredentialError> {
    let parsed =
        PasswordHash::new(hash).map_err(|err| CredentialError::InvalidHash(err.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_passwords_mix_every_character_class() {
        for _ in 0..32 {
            let password = generate_password();
            assert_eq!(password.len(), GENERATED_PASSWORD_LENGTH);
            assert!(password.bytes().any(|b| LOWERCASE.contains(&b)));
            assert!(password.bytes().any(|b| UPPERCASE.contains(&b)));
            assert!(password.bytes().any(|b| DIGITS.contains(&b)));
            assert!(password.bytes().any(|b| SYMBOLS.contains(&b)));
        }
        assert_ne!(generate_password(), generate_password());
    }

    #[test]
    fn hash_round_trips_and_hides_plaintext() {
        let password = generate_password();
        let hash = hash_password(&password).expect("hashes");

        assert!(hash.starts_with("$argon2"));
        assert!(!hash.contains(&password));
        assert!(verify_password(&password, &hash).expect("verifies"));
        assert!(!verify_password("wrong-password", &hash).expect("verifies"));
    }

    #[test]
    fn verify_rejects_malformed_hashes() {
        assert!(matches!(
            verify_password("password", "not-a-hash"),
            Err(CredentialError::InvalidHash(_))
        ));
    }
}
