//! Wiring of the PostgreSQL-backed domain services behind the HTTP ports.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};

use landlord_backend::domain::{
    AccountDeletionService, ContactService, LandlordAccountService, PasswordResetService,
};
use landlord_backend::inbound::http::state::HttpStatePorts;
use landlord_backend::outbound::notification::LogNotifier;
use landlord_backend::outbound::persistence::{
    DbPool, DieselApartmentRepository, DieselBookingRepository, DieselLandlordRepository,
};
use landlord_backend::outbound::security::Argon2Hasher;

/// Build every driving port over one connection pool.
pub(crate) fn build_ports(pool: &DbPool) -> HttpStatePorts {
    let landlords = Arc::new(DieselLandlordRepository::new(pool.clone()));
    let apartments = Arc::new(DieselApartmentRepository::new(pool.clone()));
    let bookings = Arc::new(DieselBookingRepository::new(pool.clone()));
    let hasher = Arc::new(Argon2Hasher::new());
    let notifier = Arc::new(LogNotifier::new());
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    HttpStatePorts {
        accounts: Arc::new(LandlordAccountService::new(landlords.clone(), hasher.clone())),
        password_reset: Arc::new(PasswordResetService::new(
            landlords.clone(),
            hasher,
            notifier.clone(),
            clock.clone(),
        )),
        deletion: Arc::new(AccountDeletionService::new(
            landlords, apartments, bookings, clock,
        )),
        contact: Arc::new(ContactService::new(notifier)),
    }
}
