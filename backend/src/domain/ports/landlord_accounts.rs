//! Driving port for sign-in, signup and account maintenance.
//!
//! Inbound adapters pass the caller's [`SessionState`] in and persist the
//! returned one, so the service never touches cookies or request storage.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{
    ApartmentNumber, Error, LandlordIdentity, LandlordProfile, LinkedProvider, LoginCredentials,
    NewPassword, SessionState, SignupRequest,
};

/// Authentication failures.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Unknown email, wrong password, or an account being deleted.
    #[error("invalid email or password")]
    InvalidCredentials,
    /// Storage or hashing failed.
    #[error(transparent)]
    Unexpected(#[from] Error),
}

/// Signup failures beyond field validation.
#[derive(Debug, thiserror::Error)]
pub enum SignupError {
    /// A credential already exists for the (case-insensitive) email.
    #[error("an account with that email address already exists")]
    EmailTaken,
    /// Storage or hashing failed.
    #[error(transparent)]
    Unexpected(#[from] Error),
}

/// Failures of operations on the signed-in account.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// The session carries no identity.
    #[error("sign in required")]
    NotSignedIn,
    /// The session names an account that no longer exists.
    #[error("account no longer exists")]
    AccountMissing,
    /// Storage or hashing failed.
    #[error(transparent)]
    Unexpected(#[from] Error),
}

/// Read model backing the account page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountOverview {
    pub email: String,
    pub apartment_numbers: Vec<ApartmentNumber>,
    pub linked_providers: Vec<String>,
    pub profile: LandlordProfile,
    pub gravatar_url: String,
}

impl AccountOverview {
    /// Provider names only; access tokens never leave the service.
    pub(crate) fn provider_names(providers: &[LinkedProvider]) -> Vec<String> {
        providers.iter().map(|provider| provider.kind.clone()).collect()
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LandlordAccounts: Send + Sync {
    /// Check credentials and return the identity to bind to a session.
    async fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<LandlordIdentity, AuthError>;

    /// Authenticate and log the identity into `session`.
    async fn sign_in(
        &self,
        session: SessionState,
        credentials: &LoginCredentials,
    ) -> Result<SessionState, AuthError>;

    /// Register a new landlord and log them in.
    async fn signup(
        &self,
        session: SessionState,
        request: &SignupRequest,
    ) -> Result<SessionState, SignupError>;

    /// Replace the signed-in landlord's password.
    async fn change_password(
        &self,
        session: SessionState,
        password: &NewPassword,
    ) -> Result<SessionState, AccountError>;

    /// Remove a linked external login provider. Unlinking an absent
    /// provider succeeds.
    async fn unlink_provider(
        &self,
        session: SessionState,
        provider: &str,
    ) -> Result<SessionState, AccountError>;

    /// Load the account page read model.
    async fn account_overview(
        &self,
        identity: &LandlordIdentity,
    ) -> Result<AccountOverview, AccountError>;
}
