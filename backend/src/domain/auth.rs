//! Validated form inputs for authentication and account flows.
//!
//! Constructors collect every failing field into [`ValidationErrors`] so the
//! caller can re-render the originating form with all messages at once.

use serde::Serialize;
use zeroize::Zeroizing;

use super::landlord::EmailAddress;

/// Minimum length accepted for a new password, in characters.
pub const PASSWORD_MIN_CHARS: usize = 4;

const EMAIL_INVALID: &str = "Email is not valid";
const PASSWORD_BLANK: &str = "Password cannot be blank";
const PASSWORD_TOO_SHORT: &str = "Password must be at least 4 characters long";
const PASSWORDS_DIFFER: &str = "Passwords do not match";

/// One user-correctable problem with a submitted field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Form field name as submitted.
    pub field: &'static str,
    /// Message shown next to the form.
    pub message: String,
}

/// Field-level validation failures for one form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("{} field(s) failed validation", .0.len())]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    /// Build a single-field failure.
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.push(field, message);
        errors
    }

    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, Self> {
        if self.0.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }

    /// Whether no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the failing fields.
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Messages in submission order.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(|error| error.message.clone()).collect()
    }
}

/// Email and password submitted to the login form.
///
/// # Examples
/// ```
/// use landlord_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("Ada@Example.com", "pw").unwrap();
/// assert_eq!(creds.email().as_ref(), "ada@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Validate a login submission.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let parsed = EmailAddress::parse(email).ok();
        if parsed.is_none() {
            errors.push("email", EMAIL_INVALID);
        }
        if password.is_empty() {
            errors.push("password", PASSWORD_BLANK);
        }
        match parsed {
            Some(email) => errors.into_result(|| Self {
                email,
                password: Zeroizing::new(password.to_owned()),
            }),
            None => Err(errors),
        }
    }

    /// Normalised email used for lookups.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password exactly as submitted.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// A new password confirmed by a second entry.
#[derive(Clone, PartialEq, Eq)]
pub struct NewPassword(Zeroizing<String>);

impl NewPassword {
    /// Validate a password and its confirmation.
    ///
    /// `confirm_field` names the confirmation input so messages attach to the
    /// right form field (`confirmPassword` on signup, `confirm` on reset).
    pub fn try_from_parts(
        password: &str,
        confirmation: &str,
        confirm_field: &'static str,
    ) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        Self::check(&mut errors, password, confirmation, confirm_field);
        errors.into_result(|| Self(Zeroizing::new(password.to_owned())))
    }

    fn check(
        errors: &mut ValidationErrors,
        password: &str,
        confirmation: &str,
        confirm_field: &'static str,
    ) {
        if password.chars().count() < PASSWORD_MIN_CHARS {
            errors.push("password", PASSWORD_TOO_SHORT);
        }
        if password != confirmation {
            errors.push(confirm_field, PASSWORDS_DIFFER);
        }
    }

    /// Plaintext to hand to the credential hasher.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Debug for NewPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("NewPassword(..)")
    }
}

/// Signup form: email plus a confirmed password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupRequest {
    email: EmailAddress,
    password: NewPassword,
}

impl SignupRequest {
    /// Validate a signup submission, reporting every failing field.
    pub fn try_from_parts(
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let parsed = EmailAddress::parse(email).ok();
        if parsed.is_none() {
            errors.push("email", EMAIL_INVALID);
        }
        NewPassword::check(&mut errors, password, confirm_password, "confirmPassword");
        match parsed {
            Some(email) => errors.into_result(|| Self {
                email,
                password: NewPassword(Zeroizing::new(password.to_owned())),
            }),
            None => Err(errors),
        }
    }

    /// Normalised email for the new account.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Confirmed password.
    #[must_use]
    pub fn password(&self) -> &NewPassword {
        &self.password
    }
}

/// Message submitted through the contact form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    pub name: String,
    pub email: EmailAddress,
    pub body: String,
}

impl ContactMessage {
    /// Validate a contact form submission.
    pub fn try_from_parts(name: &str, email: &str, body: &str) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        if name.trim().is_empty() {
            errors.push("name", "Name cannot be blank");
        }
        let parsed = EmailAddress::parse(email).ok();
        if parsed.is_none() {
            errors.push("email", EMAIL_INVALID);
        }
        if body.trim().is_empty() {
            errors.push("message", "Message cannot be blank");
        }
        match parsed {
            Some(email) => errors.into_result(|| Self {
                name: name.trim().to_owned(),
                email,
                body: body.to_owned(),
            }),
            None => Err(errors),
        }
    }
}
