//! Port for the password hashing primitive.
//!
//! The domain treats hashing as a black box: it hands over plaintext and gets
//! back an opaque [`PasswordHash`], or asks whether plaintext matches one.

use async_trait::async_trait;

use crate::domain::PasswordHash;

use super::define_port_error;

define_port_error! {
    /// Failures raised by credential hasher adapters.
    pub enum CredentialHasherError {
        /// Hashing could not be completed.
        Hashing { message: String } => "password hashing failed: {message}",
        /// The stored hash could not be parsed.
        MalformedHash { message: String } => "stored password hash is malformed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialHasher: Send + Sync {
    /// Hash `plaintext` with a fresh salt.
    async fn hash(&self, plaintext: &str) -> Result<PasswordHash, CredentialHasherError>;

    /// Check `plaintext` against a stored hash.
    async fn verify(
        &self,
        plaintext: &str,
        hash: &PasswordHash,
    ) -> Result<bool, CredentialHasherError>;
}
