//! Landlord credential aggregate and its value types.
//!
//! A landlord is identified internally by [`LandlordId`] and externally by a
//! normalised [`EmailAddress`]. The aggregate carries the password hash, an
//! optional password reset window, external login tokens, profile fields and
//! the apartment numbers the landlord owns.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::apartment::ApartmentNumber;
use super::reset_token::TokenDigest;

/// Validation errors returned by [`EmailAddress::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EmailValidationError {
    /// The address was blank once trimmed.
    #[error("email must not be empty")]
    Empty,
    /// The address does not follow the `local@domain.tld` grammar.
    #[error("email is not a valid address")]
    Invalid,
}

static EMAIL_RE: OnceLock<Option<Regex>> = OnceLock::new();

fn email_regex() -> Option<&'static Regex> {
    EMAIL_RE
        .get_or_init(|| {
            Regex::new(
                r"^[a-z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?)+$",
            )
            .ok()
        })
        .as_ref()
}

/// Case-normalised email address.
///
/// ## Invariants
/// - Trimmed and lower-cased at construction, so equality is
///   case-insensitive with respect to the submitted text.
/// - Matches a `local@domain.tld` grammar.
///
/// # Examples
/// ```
/// use landlord_backend::domain::EmailAddress;
///
/// let email = EmailAddress::parse("  Ada@Example.COM ").unwrap();
/// assert_eq!(email.as_ref(), "ada@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Normalise and validate a raw email address.
    pub fn parse(raw: &str) -> Result<Self, EmailValidationError> {
        let normalised = raw.trim().to_lowercase();
        if normalised.is_empty() {
            return Err(EmailValidationError::Empty);
        }
        if !email_regex().is_some_and(|re| re.is_match(&normalised)) {
            return Err(EmailValidationError::Invalid);
        }
        Ok(Self(normalised))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = EmailValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

/// Stable landlord identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandlordId(Uuid);

impl LandlordId {
    /// Generate a new random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for LandlordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Salted password hash in PHC string format.
///
/// The plaintext never reaches this type; only a
/// [`CredentialHasher`](crate::domain::ports::CredentialHasher) produces it.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash produced by a credential hasher or read from storage.
    pub fn from_encoded(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encoded PHC string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

/// Identity bound to a session once a landlord signs in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandlordIdentity {
    /// Internal landlord identifier.
    pub id: LandlordId,
    /// Normalised login email.
    pub email: EmailAddress,
}

/// Token issued by an external login provider and linked to the account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedProvider {
    /// Provider name, for example `facebook`.
    pub kind: String,
    /// Access token granted by the provider.
    pub access_token: String,
}

/// Optional profile fields shown on the account page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LandlordProfile {
    pub name: Option<String>,
    pub gender: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub picture: Option<String>,
}

/// Active password reset: digest of the issued token and its expiry.
///
/// Holding both values in one type keeps them set or cleared together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordResetWindow {
    /// SHA-256 digest of the issued token.
    pub token_digest: TokenDigest,
    /// The token is accepted only while `now < expires_at`.
    pub expires_at: DateTime<Utc>,
}

impl PasswordResetWindow {
    /// Whether the window still accepts its token at `now`.
    #[must_use]
    pub fn is_open_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Landlord credential record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Landlord {
    pub id: LandlordId,
    pub email: EmailAddress,
    pub password_hash: PasswordHash,
    pub password_reset: Option<PasswordResetWindow>,
    pub apartment_numbers: Vec<ApartmentNumber>,
    pub linked_providers: Vec<LinkedProvider>,
    pub profile: LandlordProfile,
    /// Set when a cascading deletion has started but not yet finished.
    pub deletion_requested_at: Option<DateTime<Utc>>,
}

impl Landlord {
    /// Build a freshly registered landlord with no reset, providers or listings.
    #[must_use]
    pub fn register(email: EmailAddress, password_hash: PasswordHash) -> Self {
        Self {
            id: LandlordId::random(),
            email,
            password_hash,
            password_reset: None,
            apartment_numbers: Vec::new(),
            linked_providers: Vec::new(),
            profile: LandlordProfile::default(),
            deletion_requested_at: None,
        }
    }

    /// Session identity for this landlord.
    #[must_use]
    pub fn identity(&self) -> LandlordIdentity {
        LandlordIdentity {
            id: self.id,
            email: self.email.clone(),
        }
    }

    /// Whether a cascading deletion is in progress.
    #[must_use]
    pub fn is_pending_deletion(&self) -> bool {
        self.deletion_requested_at.is_some()
    }

    /// Gravatar image URL derived from the email's SHA-256 hash.
    ///
    /// # Examples
    /// ```
    /// use landlord_backend::domain::{EmailAddress, Landlord, PasswordHash};
    ///
    /// let email = EmailAddress::parse("ada@example.com").unwrap();
    /// let landlord = Landlord::register(email, PasswordHash::from_encoded("$argon2id$stub"));
    /// assert!(landlord.gravatar_url(200).ends_with("?s=200&d=retro"));
    /// ```
    #[must_use]
    pub fn gravatar_url(&self, size: u32) -> String {
        let digest = Sha256::digest(self.email.as_ref().as_bytes());
        format!(
            "https://gravatar.com/avatar/{}?s={size}&d=retro",
            hex::encode(digest)
        )
    }
}
