//! Password hashing and verification for member accounts (Argon2id).

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::{debug, error};

/// Error types for password operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    HashingFailed(String),
    #[error("Failed to verify password: {0}")]
    VerificationFailed(String),
    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

pub trait PasswordUtils {
    /// Hashes the given password using Argon2id algorithm
    fn hash_password(password: &str) -> Result<String, PasswordError>;

    /// Verifies the given password against the stored hash
    fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError>;

    /// Minimal strength rule applied at registration
    fn validate_password_strength(password: &str) -> Result<(), Vec<String>>;
}

pub struct PasswordUtilsImpl;

impl PasswordUtils for PasswordUtilsImpl {
    fn hash_password(password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| {
                error!("Failed to hash password: {}", err);
                PasswordError::HashingFailed(err.to_string())
            })
    }

    fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(hash).map_err(|err| {
            error!("Invalid password hash format: {}", err);
            PasswordError::InvalidHashFormat
        })?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => {
                debug!("Password verification failed");
                Ok(false)
            }
            Err(err) => {
                error!("Password verification error: {}", err);
                Err(PasswordError::VerificationFailed(err.to_string()))
            }
        }
    }

    fn validate_password_strength(password: &str) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if password.chars().count() < 8 {
            errors.push("Password must be at least 8 characters long".to_string());
        }
        if !password.chars().any(|c| c.is_alphabetic()) {
            errors.push("Password must contain at least one letter".to_string());
        }
        if !password.chars().any(|c| c.is_ascii_digit()) {
            errors.push("Password must contain at least one digit".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = PasswordUtilsImpl::hash_password("villa-2024").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(PasswordUtilsImpl::verify_password("villa-2024", &hash).unwrap());
        assert!(!PasswordUtilsImpl::verify_password("villa-2025", &hash).unwrap());
    }

    #[test]
    fn test_same_password_different_salt() {
        let a = PasswordUtilsImpl::hash_password("villa-2024").unwrap();
        let b = PasswordUtilsImpl::hash_password("villa-2024").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_invalid_hash_format() {
        assert!(matches!(
            PasswordUtilsImpl::verify_password("x", "not-a-hash"),
            Err(PasswordError::InvalidHashFormat)
        ));
    }

    #[test]
    fn test_strength_rules() {
        assert!(PasswordUtilsImpl::validate_password_strength("abcdefg1").is_ok());
        assert_eq!(PasswordUtilsImpl::validate_password_strength("short").unwrap_err().len(), 2);
    }
}
