//! Session state as an explicit value.
//!
//! Services receive the caller's [`SessionState`] and return the next one.
//! They never reach into request-global storage. The HTTP adapter loads the
//! value from the session cookie and writes the returned value back.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::auth::ValidationErrors;
use super::landlord::LandlordIdentity;

/// Category of a flash message, mirroring how pages style them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FlashKind {
    Success,
    Errors,
    Info,
}

/// One-time status message shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FlashMessage {
    pub kind: FlashKind,
    pub message: String,
}

/// Identity, pending flash messages and post-login destination for one
/// browser session.
///
/// # Examples
/// ```
/// use landlord_backend::domain::{FlashKind, SessionState};
///
/// let session = SessionState::anonymous().with_flash(FlashKind::Info, "hello");
/// let (session, flash) = session.take_flash();
/// assert_eq!(flash.len(), 1);
/// assert!(session.take_flash().1.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    identity: Option<LandlordIdentity>,
    #[serde(default)]
    flash: Vec<FlashMessage>,
    #[serde(default)]
    return_to: Option<String>,
}

impl SessionState {
    /// A session with no signed-in landlord.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Signed-in identity, if any.
    #[must_use]
    pub fn identity(&self) -> Option<&LandlordIdentity> {
        self.identity.as_ref()
    }

    /// Whether a landlord is signed in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// Bind `identity` to the session.
    #[must_use]
    pub fn login(mut self, identity: LandlordIdentity) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Clear the identity. Idempotent; pending flash messages survive.
    #[must_use]
    pub fn logout(mut self) -> Self {
        self.identity = None;
        self.return_to = None;
        self
    }

    /// Queue a flash message.
    #[must_use]
    pub fn with_flash(mut self, kind: FlashKind, message: impl Into<String>) -> Self {
        self.flash.push(FlashMessage {
            kind,
            message: message.into(),
        });
        self
    }

    /// Queue every validation message as an `errors` flash.
    #[must_use]
    pub fn with_validation_errors(self, errors: &ValidationErrors) -> Self {
        errors
            .iter()
            .fold(self, |session, error| {
                session.with_flash(FlashKind::Errors, error.message.clone())
            })
    }

    /// Pending flash messages, without consuming them.
    #[must_use]
    pub fn flash(&self) -> &[FlashMessage] {
        &self.flash
    }

    /// Drain pending flash messages for rendering.
    #[must_use]
    pub fn take_flash(mut self) -> (Self, Vec<FlashMessage>) {
        let flash = std::mem::take(&mut self.flash);
        (self, flash)
    }

    /// Remember where to send the landlord after a successful login.
    #[must_use]
    pub fn remember_return_to(mut self, path: impl Into<String>) -> Self {
        self.return_to = Some(path.into());
        self
    }

    /// Take the remembered destination, if any.
    #[must_use]
    pub fn take_return_to(mut self) -> (Self, Option<String>) {
        let destination = self.return_to.take();
        (self, destination)
    }
}
