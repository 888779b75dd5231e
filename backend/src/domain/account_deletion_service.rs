//! Cascading account deletion.
//!
//! The cascade runs forward only: bookings of each owned apartment, then the
//! apartments, then the credential. The credential is marked before the
//! first delete and removed last, so an interrupted cascade leaves a marked
//! record that [`AccountDeletion::resume_pending_deletions`] can finish.
//! Every step is idempotent, which makes re-running a partial cascade safe.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{
    AccountDeletion, ApartmentRepository, BookingRepository, DeletionError, DeletionReport,
    DeletionStep, LandlordRepository, ResumeSummary,
};
use crate::domain::store_errors::{
    apartment_store_error, booking_store_error, landlord_store_error,
};
use crate::domain::{Error, FlashKind, LandlordIdentity, SessionState};

pub(crate) const ACCOUNT_DELETED_MESSAGE: &str =
    "Your account has been deleted along with your apartments and their bookings.";

/// Deletion service implementing [`AccountDeletion`].
#[derive(Clone)]
pub struct AccountDeletionService<L, A, B> {
    landlords: Arc<L>,
    apartments: Arc<A>,
    bookings: Arc<B>,
    clock: Arc<dyn Clock>,
}

impl<L, A, B> AccountDeletionService<L, A, B> {
    /// Create a new service over the three stores the cascade touches.
    pub fn new(
        landlords: Arc<L>,
        apartments: Arc<A>,
        bookings: Arc<B>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            landlords,
            apartments,
            bookings,
            clock,
        }
    }
}

fn stopped(step: DeletionStep) -> impl FnOnce(Error) -> DeletionError {
    move |source| DeletionError::PartialFailure { step, source }
}

impl<L, A, B> AccountDeletionService<L, A, B>
where
    L: LandlordRepository,
    A: ApartmentRepository,
    B: BookingRepository,
{
    /// Run the cascade for a landlord whose marker is already set.
    async fn run_cascade(
        &self,
        identity: &LandlordIdentity,
    ) -> Result<DeletionReport, DeletionError> {
        let owned = self
            .apartments
            .list_by_landlord(&identity.email)
            .await
            .map_err(apartment_store_error)
            .map_err(stopped(DeletionStep::ListApartments))?;

        let mut report = DeletionReport::default();
        for apartment in &owned {
            report.bookings_deleted += self
                .bookings
                .delete_by_apartment(apartment.number)
                .await
                .map_err(booking_store_error)
                .map_err(stopped(DeletionStep::DeleteBookings {
                    apartment: apartment.number,
                }))?;
        }

        report.apartments_deleted = self
            .apartments
            .delete_by_landlord(&identity.email)
            .await
            .map_err(apartment_store_error)
            .map_err(stopped(DeletionStep::DeleteApartments))?;

        self.landlords
            .delete(&identity.id)
            .await
            .map_err(landlord_store_error)
            .map_err(stopped(DeletionStep::DeleteCredential))?;

        Ok(report)
    }
}

#[async_trait]
impl<L, A, B> AccountDeletion for AccountDeletionService<L, A, B>
where
    L: LandlordRepository,
    A: ApartmentRepository,
    B: BookingRepository,
{
    async fn delete_account(&self, session: SessionState) -> Result<SessionState, DeletionError> {
        let identity = session
            .identity()
            .cloned()
            .ok_or(DeletionError::NotSignedIn)?;

        self.landlords
            .mark_deletion_requested(&identity.id, self.clock.utc())
            .await
            .map_err(landlord_store_error)?;

        let report = match self.run_cascade(&identity).await {
            Ok(report) => report,
            Err(error) => {
                warn!(landlord_id = %identity.id, error = %error, "account deletion interrupted");
                return Err(error);
            }
        };

        info!(
            landlord_id = %identity.id,
            apartments = report.apartments_deleted,
            bookings = report.bookings_deleted,
            "account deleted"
        );
        Ok(session
            .logout()
            .with_flash(FlashKind::Info, ACCOUNT_DELETED_MESSAGE))
    }

    async fn resume_pending_deletions(&self) -> Result<ResumeSummary, Error> {
        let pending = self
            .landlords
            .list_pending_deletions()
            .await
            .map_err(landlord_store_error)?;

        let mut summary = ResumeSummary::default();
        for landlord in pending {
            match self.run_cascade(&landlord.identity()).await {
                Ok(report) => {
                    info!(
                        landlord_id = %landlord.id,
                        apartments = report.apartments_deleted,
                        bookings = report.bookings_deleted,
                        "interrupted account deletion completed"
                    );
                    summary.completed.push(landlord.id);
                }
                Err(error) => {
                    warn!(landlord_id = %landlord.id, error = %error, "account deletion still incomplete");
                    summary.failed.push((landlord.id, error));
                }
            }
        }
        Ok(summary)
    }
}

#[cfg(test)]
#[path = "account_deletion_service_tests.rs"]
mod tests;
