//! Port abstraction for landlord credential persistence.
//!
//! Every method is a single-record read or write. Token redemption is one
//! conditional update so two concurrent redemptions cannot both succeed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    EmailAddress, Landlord, LandlordId, PasswordHash, PasswordResetWindow, TokenDigest,
};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by landlord repository adapters.
    pub enum LandlordRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "landlord repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "landlord repository query failed: {message}",
        /// Another credential already uses this email.
        DuplicateEmail { email: String } => "landlord email already registered: {email}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LandlordRepository: Send + Sync {
    /// Fetch a landlord by normalised email.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Landlord>, LandlordRepositoryError>;

    /// Fetch a landlord by identifier.
    async fn find_by_id(&self, id: &LandlordId)
    -> Result<Option<Landlord>, LandlordRepositoryError>;

    /// Insert a new credential record.
    ///
    /// Fails with [`LandlordRepositoryError::DuplicateEmail`] when the email
    /// is already taken.
    async fn insert(&self, landlord: &Landlord) -> Result<(), LandlordRepositoryError>;

    /// Overwrite the password hash. Returns `false` when no record matched.
    async fn update_password(
        &self,
        id: &LandlordId,
        password_hash: &PasswordHash,
    ) -> Result<bool, LandlordRepositoryError>;

    /// Store an active reset window, replacing any previous one.
    async fn set_password_reset(
        &self,
        id: &LandlordId,
        window: &PasswordResetWindow,
    ) -> Result<(), LandlordRepositoryError>;

    /// Find the landlord whose reset digest matches and has not expired at
    /// `now`, in one read.
    async fn find_by_active_reset(
        &self,
        digest: &TokenDigest,
        now: DateTime<Utc>,
    ) -> Result<Option<Landlord>, LandlordRepositoryError>;

    /// Atomically swap the password and clear the reset window when the
    /// digest matches and has not expired at `now`.
    ///
    /// Returns the updated landlord, or `None` when nothing matched.
    async fn redeem_password_reset(
        &self,
        digest: &TokenDigest,
        now: DateTime<Utc>,
        password_hash: &PasswordHash,
    ) -> Result<Option<Landlord>, LandlordRepositoryError>;

    /// Remove every linked provider token of `kind`. Returns `false` when
    /// none was linked.
    async fn remove_provider(
        &self,
        id: &LandlordId,
        kind: &str,
    ) -> Result<bool, LandlordRepositoryError>;

    /// Persist the deletion-in-progress marker.
    async fn mark_deletion_requested(
        &self,
        id: &LandlordId,
        requested_at: DateTime<Utc>,
    ) -> Result<(), LandlordRepositoryError>;

    /// Landlords whose deletion marker is set.
    async fn list_pending_deletions(&self) -> Result<Vec<Landlord>, LandlordRepositoryError>;

    /// Remove the credential record. Deleting a missing record succeeds.
    async fn delete(&self, id: &LandlordId) -> Result<(), LandlordRepositoryError>;
}
