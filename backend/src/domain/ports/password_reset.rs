//! Driving port for the password reset flow.
//!
//! A landlord moves from no active reset to an issued token and back. An
//! expired token is indistinguishable from no token.

use async_trait::async_trait;

use crate::domain::{EmailAddress, Error, NewPassword, ResetLink, ResetToken, SessionState};

/// Failures while issuing a reset token.
#[derive(Debug, thiserror::Error)]
pub enum ResetRequestError {
    /// No credential exists for the email.
    #[error("no account with that email address exists")]
    AccountNotFound,
    /// Storage failed.
    #[error(transparent)]
    Unexpected(#[from] Error),
}

/// Failures while checking or redeeming a reset token.
#[derive(Debug, thiserror::Error)]
pub enum ResetError {
    /// No credential holds this token with an expiry in the future.
    #[error("password reset token is invalid or has expired")]
    TokenInvalidOrExpired,
    /// Storage or hashing failed.
    #[error(transparent)]
    Unexpected(#[from] Error),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordReset: Send + Sync {
    /// Issue a fresh token valid for one hour, replacing any earlier one.
    async fn request_reset(&self, email: &EmailAddress) -> Result<ResetToken, ResetRequestError>;

    /// Hand a reset link to the notification channel.
    async fn deliver_reset_link(&self, email: &EmailAddress, link: &ResetLink)
    -> Result<(), Error>;

    /// Succeeds when the token is currently redeemable.
    async fn verify_reset_token(&self, token: &ResetToken) -> Result<(), ResetError>;

    /// Consume the token, set the new password and log the landlord in.
    async fn redeem_reset(
        &self,
        session: SessionState,
        token: &ResetToken,
        password: &NewPassword,
    ) -> Result<SessionState, ResetError>;
}
