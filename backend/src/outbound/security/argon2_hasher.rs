//! Argon2id implementation of the `CredentialHasher` port.
//!
//! Hashes are stored in PHC string format, so the parameters and salt travel
//! with the hash. Hashing is CPU-bound and runs on the blocking pool.

use argon2::Argon2;
use argon2::password_hash::{
    Error as PasswordHashError, PasswordHash as PhcHash, PasswordHasher, PasswordVerifier,
    SaltString,
};
use async_trait::async_trait;
use rand::rngs::OsRng;
use zeroize::Zeroizing;

use crate::domain::PasswordHash;
use crate::domain::ports::{CredentialHasher, CredentialHasherError};

/// Argon2id hasher with the crate's default parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Hasher;

impl Argon2Hasher {
    pub fn new() -> Self {
        Self
    }
}

fn hash_blocking(plaintext: &str) -> Result<PasswordHash, CredentialHasherError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| PasswordHash::from_encoded(hash.to_string()))
        .map_err(|err| CredentialHasherError::hashing(err.to_string()))
}

fn verify_blocking(plaintext: &str, encoded: &str) -> Result<bool, CredentialHasherError> {
    let parsed = PhcHash::new(encoded)
        .map_err(|err| CredentialHasherError::malformed_hash(err.to_string()))?;
    match Argon2::default().verify_password(plaintext.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(PasswordHashError::Password) => Ok(false),
        Err(err) => Err(CredentialHasherError::hashing(err.to_string())),
    }
}

async fn run_blocking<T, F>(task: F) -> Result<T, CredentialHasherError>
where
    F: FnOnce() -> Result<T, CredentialHasherError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|err| CredentialHasherError::hashing(format!("hashing task failed: {err}")))?
}

#[async_trait]
impl CredentialHasher for Argon2Hasher {
    async fn hash(&self, plaintext: &str) -> Result<PasswordHash, CredentialHasherError> {
        let plaintext = Zeroizing::new(plaintext.to_owned());
        run_blocking(move || hash_blocking(&plaintext)).await
    }

    async fn verify(
        &self,
        plaintext: &str,
        hash: &PasswordHash,
    ) -> Result<bool, CredentialHasherError> {
        let plaintext = Zeroizing::new(plaintext.to_owned());
        let encoded = hash.as_str().to_owned();
        run_blocking(move || verify_blocking(&plaintext, &encoded)).await
    }
}
