//! Password reset domain service.
//!
//! Issues single-use reset tokens that expire after one hour and redeems
//! them. Only the SHA-256 digest of a token is stored; the plaintext exists
//! in the link handed to the landlord and nowhere else.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{
    CredentialHasher, LandlordRepository, NotificationPort, PasswordReset, ResetError,
    ResetRequestError,
};
use crate::domain::store_errors::{hasher_error, landlord_store_error, notification_error};
use crate::domain::{
    EmailAddress, Error, FlashKind, NewPassword, PasswordResetWindow, ResetLink, ResetToken,
    SessionState, reset_token_ttl,
};

pub(crate) const RESET_COMPLETE_MESSAGE: &str = "Success! Your password has been changed.";

/// Password reset service implementing [`PasswordReset`].
#[derive(Clone)]
pub struct PasswordResetService<L, H, N> {
    landlords: Arc<L>,
    hasher: Arc<H>,
    notifier: Arc<N>,
    clock: Arc<dyn Clock>,
}

impl<L, H, N> PasswordResetService<L, H, N> {
    /// Create a new service.
    pub fn new(landlords: Arc<L>, hasher: Arc<H>, notifier: Arc<N>, clock: Arc<dyn Clock>) -> Self {
        Self {
            landlords,
            hasher,
            notifier,
            clock,
        }
    }
}

#[async_trait]
impl<L, H, N> PasswordReset for PasswordResetService<L, H, N>
where
    L: LandlordRepository,
    H: CredentialHasher,
    N: NotificationPort,
{
    async fn request_reset(&self, email: &EmailAddress) -> Result<ResetToken, ResetRequestError> {
        let landlord = self
            .landlords
            .find_by_email(email)
            .await
            .map_err(landlord_store_error)?
            .filter(|landlord| landlord.deletion_requested_at.is_none())
            .ok_or(ResetRequestError::AccountNotFound)?;

        let token = ResetToken::generate();
        let window = PasswordResetWindow {
            token_digest: token.digest(),
            expires_at: self.clock.utc() + reset_token_ttl(),
        };
        self.landlords
            .set_password_reset(&landlord.id, &window)
            .await
            .map_err(landlord_store_error)?;

        info!(
            landlord_id = %landlord.id,
            expires_at = %window.expires_at,
            "password reset token issued"
        );
        Ok(token)
    }

    async fn deliver_reset_link(
        &self,
        email: &EmailAddress,
        link: &ResetLink,
    ) -> Result<(), Error> {
        self.notifier
            .send_reset_link(email, link)
            .await
            .map_err(notification_error)
    }

    async fn verify_reset_token(&self, token: &ResetToken) -> Result<(), ResetError> {
        self.landlords
            .find_by_active_reset(&token.digest(), self.clock.utc())
            .await
            .map_err(landlord_store_error)?
            .map(|_| ())
            .ok_or(ResetError::TokenInvalidOrExpired)
    }

    async fn redeem_reset(
        &self,
        session: SessionState,
        token: &ResetToken,
        password: &NewPassword,
    ) -> Result<SessionState, ResetError> {
        // Hash first: the conditional update below must be the only write.
        let password_hash = self
            .hasher
            .hash(password.expose())
            .await
            .map_err(hasher_error)?;
        let landlord = self
            .landlords
            .redeem_password_reset(&token.digest(), self.clock.utc(), &password_hash)
            .await
            .map_err(landlord_store_error)?
            .ok_or(ResetError::TokenInvalidOrExpired)?;

        info!(landlord_id = %landlord.id, "password reset redeemed");
        if let Err(error) = self.notifier.send_password_changed(&landlord.email).await {
            warn!(landlord_id = %landlord.id, error = %error, "password change notice not sent");
        }

        Ok(session
            .login(landlord.identity())
            .with_flash(FlashKind::Success, RESET_COMPLETE_MESSAGE))
    }
}

#[cfg(test)]
#[path = "password_reset_service_tests.rs"]
mod tests;
