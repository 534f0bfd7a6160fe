//! Password hashing with Argon2

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::sync::OnceLock;
use thiserror::Error;

use movie_shared::constants::{MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};

/// Minimum zxcvbn score (0-4) accepted for new passwords.
const MIN_STRENGTH_SCORE: u8 = 2;

static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();

#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Hash error: {0}")]
    HashError(String),
    #[error("Password too short")]
    TooShort,
    #[error("Password too long")]
    TooLong,
    #[error("Password too weak")]
    TooWeak,
}

pub struct PasswordService;

impl PasswordService {
    pub fn hash(password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| PasswordError::HashError(e.to_string()))
    }

    pub fn verify(password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| PasswordError::HashError(e.to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Spends the cost of one verification when no account matched, so a
    /// failed login takes the same time whether or not the email exists.
    pub fn verify_dummy(password: &str) {
        let hash = DUMMY_HASH.get_or_init(|| Self::hash("unmatched-login-placeholder").ok());
        if let Some(hash) = hash {
            let _ = Self::verify(password, hash);
        }
    }

    /// Length and strength policy for new passwords. `user_inputs` are values
    /// the password must not be guessable from (email, display name).
    pub fn check_policy(password: &str, user_inputs: &[&str]) -> Result<(), PasswordError> {
        let length = password.chars().count();
        if length < MIN_PASSWORD_LENGTH {
            return Err(PasswordError::TooShort);
        }
        if length > MAX_PASSWORD_LENGTH {
            return Err(PasswordError::TooLong);
        }
        let entropy = zxcvbn::zxcvbn(password, user_inputs);
        if u8::from(entropy.score()) < MIN_STRENGTH_SCORE {
            return Err(PasswordError::TooWeak);
        }
        Ok(())
    }
}
