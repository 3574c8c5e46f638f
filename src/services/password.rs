//! Password hashing and verification.
//!
//! Passwords are stored as Argon2id PHC strings (`$argon2id$v=19$...`), which
//! carry their own salt and cost parameters.
//!
//! Stored values without the `$argon2` prefix predate hashing (seed data and
//! rows written by older deployments) and are compared as cleartext.
//!
//! Hashing is CPU-bound; handlers go through [`hash`] and [`verify`], which run
//! the work on the blocking thread pool.

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};

use crate::error::AppError;

const ARGON2_PREFIX: &str = "$argon2";

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to compute password hash: {e}")))
}

/// Check `password` against a stored value produced by [`hash_password`] or a legacy cleartext value.
pub fn verify_password(password: &str, stored: &str) -> bool {
    if !stored.starts_with(ARGON2_PREFIX) {
        return password == stored;
    }

    PasswordHash::new(stored).is_ok_and(|hash| {
        Argon2::default()
            .verify_password(password.as_bytes(), &hash)
            .is_ok()
    })
}

/// [`hash_password`] off the async runtime.
pub async fn hash(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(format!("Password hashing task failed: {e}")))?
}

/// [`verify_password`] off the async runtime.
pub async fn verify(password: String, stored: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &stored))
        .await
        .map_err(|e| AppError::Internal(format!("Password verification task failed: {e}")))
}
