//! Password reset tokens.
//!
//! A token is 16 bytes from the operating system RNG, hex encoded for use in
//! a URL. Only its SHA-256 digest is persisted, so a leaked database row does
//! not hand out a usable reset link.

use std::fmt;

use chrono::TimeDelta;
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

/// Number of random bytes in a token (128 bits).
pub const RESET_TOKEN_BYTES: usize = 16;

/// How long an issued token stays redeemable.
#[must_use]
pub fn reset_token_ttl() -> TimeDelta {
    TimeDelta::hours(1)
}

/// Rejection reasons for a token supplied in a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ResetTokenFormatError {
    #[error("reset token must be {expected} hex characters", expected = RESET_TOKEN_BYTES * 2)]
    Malformed,
}

/// Opaque reset secret handed to the account owner.
///
/// # Examples
/// ```
/// use landlord_backend::domain::ResetToken;
///
/// let token = ResetToken::generate();
/// let parsed = ResetToken::parse(token.as_str()).unwrap();
/// assert_eq!(parsed.digest(), token.digest());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ResetToken(Zeroizing<String>);

impl ResetToken {
    /// Draw a fresh token from the OS RNG.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = Zeroizing::new([0_u8; RESET_TOKEN_BYTES]);
        OsRng.fill_bytes(&mut bytes[..]);
        Self(Zeroizing::new(hex::encode(&bytes[..])))
    }

    /// Accept a token presented by a client.
    pub fn parse(raw: &str) -> Result<Self, ResetTokenFormatError> {
        let trimmed = raw.trim();
        let well_formed = trimmed.len() == RESET_TOKEN_BYTES * 2
            && trimmed.bytes().all(|byte| byte.is_ascii_hexdigit());
        if !well_formed {
            return Err(ResetTokenFormatError::Malformed);
        }
        Ok(Self(Zeroizing::new(trimmed.to_ascii_lowercase())))
    }

    /// Hex form used in reset links.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Digest stored alongside the credential record.
    #[must_use]
    pub fn digest(&self) -> TokenDigest {
        TokenDigest(hex::encode(Sha256::digest(self.0.as_bytes())))
    }
}

impl fmt::Debug for ResetToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ResetToken(..)")
    }
}

/// Hex-encoded SHA-256 digest of a [`ResetToken`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenDigest(String);

impl TokenDigest {
    /// Wrap a digest read back from storage.
    pub fn from_hex(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Hex string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Absolute URL a landlord follows to redeem a [`ResetToken`].
#[derive(Clone, PartialEq, Eq)]
pub struct ResetLink(String);

impl ResetLink {
    /// Build `{base_url}/reset/{token}`.
    ///
    /// # Examples
    /// ```
    /// use landlord_backend::domain::{ResetLink, ResetToken};
    ///
    /// let token = ResetToken::parse("0123456789abcdef0123456789abcdef").unwrap();
    /// let link = ResetLink::for_token("http://localhost:3000/", &token);
    /// assert_eq!(link.as_str(), "http://localhost:3000/reset/0123456789abcdef0123456789abcdef");
    /// ```
    #[must_use]
    pub fn for_token(base_url: &str, token: &ResetToken) -> Self {
        Self(format!(
            "{}/reset/{}",
            base_url.trim_end_matches('/'),
            token.as_str()
        ))
    }

    /// URL text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for ResetLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ResetLink(..)")
    }
}
