//! Landlord account services.
//!
//! Implements the [`LandlordAccounts`] driving port: sign-in, signup,
//! password change, provider unlinking and the account page read model.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    AccountError, AccountOverview, AuthError, CredentialHasher, LandlordAccounts,
    LandlordRepository, LandlordRepositoryError, SignupError,
};
use crate::domain::store_errors::{hasher_error, landlord_store_error};
use crate::domain::{
    FlashKind, Landlord, LandlordIdentity, LoginCredentials, NewPassword, SessionState,
    SignupRequest,
};

pub(crate) const SIGNED_IN_MESSAGE: &str = "Success! You are logged in.";
pub(crate) const PASSWORD_CHANGED_MESSAGE: &str = "Password has been changed.";
const GRAVATAR_SIZE: u32 = 200;

/// Account service implementing [`LandlordAccounts`].
#[derive(Clone)]
pub struct LandlordAccountService<L, H> {
    landlords: Arc<L>,
    hasher: Arc<H>,
}

impl<L, H> LandlordAccountService<L, H> {
    /// Create a new service over a landlord store and a password hasher.
    pub fn new(landlords: Arc<L>, hasher: Arc<H>) -> Self {
        Self { landlords, hasher }
    }
}

impl<L, H> LandlordAccountService<L, H>
where
    L: LandlordRepository,
    H: CredentialHasher,
{
    fn signed_in(session: &SessionState) -> Result<LandlordIdentity, AccountError> {
        session.identity().cloned().ok_or(AccountError::NotSignedIn)
    }

    async fn load(&self, identity: &LandlordIdentity) -> Result<Landlord, AccountError> {
        self.landlords
            .find_by_id(&identity.id)
            .await
            .map_err(landlord_store_error)?
            .ok_or(AccountError::AccountMissing)
    }
}

#[async_trait]
impl<L, H> LandlordAccounts for LandlordAccountService<L, H>
where
    L: LandlordRepository,
    H: CredentialHasher,
{
    async fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<LandlordIdentity, AuthError> {
        let Some(landlord) = self
            .landlords
            .find_by_email(credentials.email())
            .await
            .map_err(landlord_store_error)?
        else {
            debug!("sign-in attempt for unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        if landlord.is_pending_deletion() {
            warn!(landlord_id = %landlord.id, "sign-in refused: account deletion in progress");
            return Err(AuthError::InvalidCredentials);
        }

        let matches = self
            .hasher
            .verify(credentials.password(), &landlord.password_hash)
            .await
            .map_err(hasher_error)?;
        if !matches {
            debug!(landlord_id = %landlord.id, "sign-in attempt with wrong password");
            return Err(AuthError::InvalidCredentials);
        }
        Ok(landlord.identity())
    }

    async fn sign_in(
        &self,
        session: SessionState,
        credentials: &LoginCredentials,
    ) -> Result<SessionState, AuthError> {
        let identity = self.authenticate(credentials).await?;
        info!(landlord_id = %identity.id, "landlord signed in");
        Ok(session
            .login(identity)
            .with_flash(FlashKind::Success, SIGNED_IN_MESSAGE))
    }

    async fn signup(
        &self,
        session: SessionState,
        request: &SignupRequest,
    ) -> Result<SessionState, SignupError> {
        let existing = self
            .landlords
            .find_by_email(request.email())
            .await
            .map_err(landlord_store_error)?;
        if existing.is_some() {
            return Err(SignupError::EmailTaken);
        }

        let password_hash = self
            .hasher
            .hash(request.password().expose())
            .await
            .map_err(hasher_error)?;
        let landlord = Landlord::register(request.email().clone(), password_hash);

        // A concurrent signup can win the race between the lookup and the insert.
        match self.landlords.insert(&landlord).await {
            Ok(()) => {}
            Err(LandlordRepositoryError::DuplicateEmail { .. }) => {
                return Err(SignupError::EmailTaken);
            }
            Err(other) => return Err(landlord_store_error(other).into()),
        }

        info!(landlord_id = %landlord.id, "landlord registered");
        Ok(session.login(landlord.identity()))
    }

    async fn change_password(
        &self,
        session: SessionState,
        password: &NewPassword,
    ) -> Result<SessionState, AccountError> {
        let identity = Self::signed_in(&session)?;
        let password_hash = self
            .hasher
            .hash(password.expose())
            .await
            .map_err(hasher_error)?;
        let updated = self
            .landlords
            .update_password(&identity.id, &password_hash)
            .await
            .map_err(landlord_store_error)?;
        if !updated {
            return Err(AccountError::AccountMissing);
        }

        info!(landlord_id = %identity.id, "password changed");
        Ok(session.with_flash(FlashKind::Success, PASSWORD_CHANGED_MESSAGE))
    }

    async fn unlink_provider(
        &self,
        session: SessionState,
        provider: &str,
    ) -> Result<SessionState, AccountError> {
        let identity = Self::signed_in(&session)?;
        let removed = self
            .landlords
            .remove_provider(&identity.id, provider)
            .await
            .map_err(landlord_store_error)?;
        debug!(landlord_id = %identity.id, provider, removed, "provider unlink processed");
        Ok(session.with_flash(
            FlashKind::Info,
            format!("{provider} account has been unlinked."),
        ))
    }

    async fn account_overview(
        &self,
        identity: &LandlordIdentity,
    ) -> Result<AccountOverview, AccountError> {
        let landlord = self.load(identity).await?;
        Ok(AccountOverview {
            email: landlord.email.to_string(),
            apartment_numbers: landlord.apartment_numbers.clone(),
            linked_providers: AccountOverview::provider_names(&landlord.linked_providers),
            gravatar_url: landlord.gravatar_url(GRAVATAR_SIZE),
            profile: landlord.profile,
        })
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
